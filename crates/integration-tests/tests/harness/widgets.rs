//! A small widget service whose handler fails in every way the status layer cares about

use ferry_core::{BoxError, Error, StructuredError};
use prost_types::Any;
use tonic::Code;

/// The only widget in stock
pub const SPROCKET_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum WidgetRequest {
    /// Look a widget up by id
    Get(u32),
    /// Storage fails with an unstructured error
    Storage,
    /// Throttled, with a retry hint attached
    Throttled,
    /// Fails with a detail that cannot be converted
    Corrupt,
    /// Fails with a message that needs escaping in headers
    Unicode,
}

/// Domain errors of the widget service
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("widget {0} does not exist")]
    Missing(u32),

    #[error("too many widget lookups")]
    Throttled,
}

impl StructuredError for WidgetError {
    fn status_code(&self) -> Code {
        match self {
            Self::Missing(_) => Code::NotFound,
            Self::Throttled => Code::ResourceExhausted,
        }
    }

    fn reason(&self) -> &str {
        match self {
            Self::Missing(_) => "WIDGET_NOT_FOUND",
            Self::Throttled => "WIDGET_THROTTLED",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

/// `google.rpc.RetryInfo { retry_delay: 5s }`
pub fn retry_info() -> Any {
    Any {
        type_url: "type.googleapis.com/google.rpc.RetryInfo".to_owned(),
        value: vec![0x0a, 0x02, 0x08, 0x05],
    }
}

pub async fn handle(request: WidgetRequest) -> Result<Widget, BoxError> {
    match request {
        WidgetRequest::Get(SPROCKET_ID) => Ok(Widget {
            id: SPROCKET_ID,
            name: "sprocket".to_owned(),
        }),
        WidgetRequest::Get(id) => Err(Box::new(Error::from_structured(&WidgetError::Missing(id)))),
        WidgetRequest::Storage => Err(Box::new(std::io::Error::other("storage offline"))),
        WidgetRequest::Throttled => {
            Err(Box::new(Error::from_structured(&WidgetError::Throttled).with_detail(retry_info())))
        }
        WidgetRequest::Corrupt => {
            let broken = Any {
                type_url: "not-a-type-url".to_owned(),
                value: vec![1, 2, 3],
            };
            Err(Box::new(Error::internal("INDEX_CORRUPT", "widget index is corrupt").with_detail(broken)))
        }
        WidgetRequest::Unicode => Err(Box::new(Error::invalid_argument(
            "BAD_NAME",
            "name “Ωmega” is not allowed\nuse ASCII",
        ))),
    }
}
