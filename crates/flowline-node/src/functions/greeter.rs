//! The greeter function.
//!
//! Writes `Hello, world!\n` to the response and the same line to the
//! process-wide log sink. Reads nothing from the request: any method, path,
//! or body produces the identical output, every invocation, with no carried
//! state.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use flowline_core::error::Result;
use flowline_core::function::{FunctionRequest, FunctionResponse};

use crate::functions::host::{log_line, FunctionService, LogSink};

const GREETING: &str = "Hello, world!";

pub struct Greeter {
    log: LogSink,
}

impl Greeter {
    pub fn new(log: LogSink) -> Self {
        Self { log }
    }

    /// Greeter logging to stdout, as deployed.
    pub fn stdout() -> Self {
        Self::new(Arc::new(Mutex::new(std::io::stdout())))
    }
}

#[async_trait]
impl FunctionService for Greeter {
    fn name(&self) -> &'static str {
        "greeter"
    }

    async fn invoke(&self, _req: FunctionRequest) -> Result<FunctionResponse> {
        log_line(&self.log, GREETING)?;
        Ok(FunctionResponse::text(format!("{GREETING}\n")))
    }
}
