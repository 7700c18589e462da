//! Carries statuses between a server-side and a client-side stack the way gRPC does

use ferry_core::BoxError;
use ferry_status::StatusLayer;
use tonic::Status;
use tonic::codegen::http::HeaderMap;
use tower::{Layer, ServiceExt, service_fn};

use super::widgets::{self, Widget, WidgetRequest};

/// Send a status through `grpc-status` headers and read it back on the other side
pub fn transmit(status: &Status) -> Status {
    let mut headers = HeaderMap::new();
    status.add_header(&mut headers).expect("status fits in headers");
    Status::from_header_map(&headers).expect("grpc-status header is present")
}

/// What the transport sends for a handler error
///
/// Statuses go out as they are; anything else is converted the way tonic
/// does for errors that never became a status.
pub fn into_wire(err: BoxError) -> Status {
    let status = match err.downcast::<Status>() {
        Ok(status) => *status,
        Err(err) => Status::from_error(err),
    };

    transmit(&status)
}

/// Call the widget service through a server layer, across the wire, and back through a client layer
pub async fn call(server: StatusLayer, client: StatusLayer, request: WidgetRequest) -> Result<Widget, BoxError> {
    let remote = service_fn(move |request: WidgetRequest| async move {
        server
            .layer(service_fn(widgets::handle))
            .oneshot(request)
            .await
            .map_err(into_wire)
    });

    client.layer(remote).oneshot(request).await
}

/// Run only the server side and return what it puts on the wire
pub async fn serve(server: StatusLayer, request: WidgetRequest) -> Status {
    let err = server
        .layer(service_fn(widgets::handle))
        .oneshot(request)
        .await
        .expect_err("request should fail");

    into_wire(err)
}
