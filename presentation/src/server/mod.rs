//! Transport adapters
//!
//! Both transports hand raw frames to the same [`Dispatcher`](rhmcp_application::Dispatcher)
//! and differ only in framing and in what they can inject into the call
//! context.

pub mod http;
pub mod stdio;

pub use http::{HttpServer, HttpServerConfig};
pub use stdio::StdioServer;

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use rhmcp_application::{
        BoundaryExecutor, CallContext, Dispatcher, ToolCatalog, ToolSchemaPort,
    };
    use rhmcp_domain::{BoundaryCallSpec, BridgeError, Credential, ToolDefinition};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    /// Answers with the argv it was given, optionally after a delay.
    pub struct EchoExecutor {
        delay: Option<Duration>,
    }

    impl EchoExecutor {
        pub fn instant() -> Arc<Self> {
            Arc::new(Self { delay: None })
        }

        pub fn delayed(delay: Duration) -> Arc<Self> {
            Arc::new(Self { delay: Some(delay) })
        }
    }

    #[async_trait]
    impl BoundaryExecutor for EchoExecutor {
        async fn invoke(
            &self,
            spec: BoundaryCallSpec,
            ctx: &CallContext,
        ) -> Result<Value, BridgeError> {
            if let Some(delay) = self.delay {
                tokio::select! {
                    _ = ctx.cancel.cancelled() => return Err(BridgeError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            Ok(json!({
                "argv": spec.to_argv(),
                "api_key_override": ctx.api_key.is_some(),
            }))
        }
    }

    struct NameOnlySchema;

    impl ToolSchemaPort for NameOnlySchema {
        fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
            json!({ "name": tool.name })
        }
    }

    /// A dispatcher with a signing key; the API key is configured only when
    /// `with_api_key` is set.
    pub fn dispatcher(executor: Arc<dyn BoundaryExecutor>, with_api_key: bool) -> Dispatcher {
        let credential = Credential::new(
            with_api_key.then(|| "rh-api-key".to_string()),
            Some("c2VjcmV0LXNlZWQ=".to_string()),
        );
        Dispatcher::new(
            Arc::new(ToolCatalog::build().unwrap()),
            executor,
            Arc::new(credential),
            &NameOnlySchema,
        )
    }
}
