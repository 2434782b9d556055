//! The Executor - single entry point to the counter service.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! service operations and converts results to outputs and responses.

use std::sync::Arc;

use tracing::{debug, warn};

use ceiling_engine::{CeilingConfig, CounterService};

use crate::convert::convert_result;
use crate::handlers::{catalog, migration, record};
use crate::types::{status, Response};
use crate::{Command, Error, Output, Result};

/// The command executor - single entry point to the counter service.
///
/// The Executor holds a shared reference to the service but no state of its
/// own.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads.
///
/// # Example
///
/// ```ignore
/// use ceiling_executor::{CeilingConfig, Command, Executor};
///
/// let executor = Executor::open(CeilingConfig::default())?;
/// executor.execute(Command::PlatformCreate { name: "Google".into() })?;
/// ```
pub struct Executor {
    service: Arc<CounterService>,
}

impl Executor {
    /// Create a new executor wrapping a counter service.
    pub fn new(service: Arc<CounterService>) -> Self {
        Self { service }
    }

    /// Executor over a fresh in-memory service.
    pub fn open(config: CeilingConfig) -> Result<Self> {
        let service = convert_result(CounterService::open(config))?;
        Ok(Self::new(Arc::new(service)))
    }

    /// The wrapped service.
    pub fn service(&self) -> &Arc<CounterService> {
        &self.service
    }

    /// Execute a single command.
    ///
    /// Returns the command result or an error.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let s = self.service.as_ref();
        match cmd {
            Command::Ping => Ok(Output::Pong {
                version: env!("CARGO_PKG_VERSION").to_string(),
            }),
            Command::Health => {
                convert_result(s.health_check())?;
                Ok(Output::Unit)
            }

            // Platforms
            Command::PlatformCreate { name } => catalog::platform_create(s, name),
            Command::PlatformRename { platform, name } => {
                catalog::platform_rename(s, platform, name)
            }
            Command::PlatformDelete { platform } => catalog::platform_delete(s, platform),
            Command::PlatformList => catalog::platform_list(s),

            // Elements
            Command::ElementCreate { platform, name } => catalog::element_create(s, platform, name),
            Command::ElementRename {
                platform,
                element,
                name,
            } => catalog::element_rename(s, platform, element, name),
            Command::ElementDelete { platform, element } => {
                catalog::element_delete(s, platform, element)
            }
            Command::ElementList { platform } => catalog::element_list(s, platform),

            // Counters
            Command::CounterCreate {
                platform,
                element,
                name,
                max_value,
            } => catalog::counter_create(s, platform, element, name, max_value),
            Command::CounterUpdate {
                platform,
                element,
                counter,
                name,
                max_value,
            } => catalog::counter_update(s, platform, element, counter, name, max_value),
            Command::CounterDelete {
                platform,
                element,
                counter,
            } => catalog::counter_delete(s, platform, element, counter),
            Command::CounterList { platform, element } => {
                catalog::counter_list(s, platform, element)
            }

            // Records
            Command::RecordCreate {
                platform,
                element,
                record,
            } => record::record_create(s, platform, element, record),
            Command::RecordList { platform, element } => record::record_list(s, platform, element),
            Command::RecordGet {
                platform,
                element,
                record,
            } => record::record_get(s, platform, element, record),
            Command::RecordDelete {
                platform,
                element,
                record,
            } => record::record_delete(s, platform, element, record),
            Command::ValueGet {
                platform,
                element,
                record,
                counter,
            } => record::value_get(s, platform, element, record, counter),
            Command::Increment {
                platform,
                element,
                record,
                counter,
                delta,
            } => record::increment(s, platform, element, record, counter, delta),

            // Migrations
            Command::MigrationList => migration::migration_list(s),
            Command::MigrationGet { job_id } => migration::migration_get(s, job_id),
            Command::MigrationResume { job_id } => migration::migration_resume(s, job_id),
            Command::MigrationCancel => migration::migration_cancel(s),
        }
    }

    /// Execute multiple commands sequentially.
    ///
    /// Returns all results in the same order as the input commands.
    /// Execution continues even if some commands fail.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    /// Execute a command and render the boundary response.
    pub fn respond(&self, cmd: Command) -> Response {
        let name = cmd.name();
        let result = self.execute(cmd).and_then(|output| {
            let code = output.status_code();
            let body = if code == status::NO_CONTENT {
                serde_json::Value::Null
            } else {
                serde_json::to_value(&output).map_err(|e| Error::Internal {
                    reason: format!("failed to encode output: {}", e),
                })?
            };
            Ok(Response { status: code, body })
        });

        match result {
            Ok(response) => {
                debug!(target: "ceiling::executor", command = name, status = response.status, "Command executed");
                response
            }
            Err(err) => {
                let response = Response::from_error(&err);
                if response.status >= status::INTERNAL {
                    warn!(target: "ceiling::executor", command = name, error = %err, "Command failed");
                } else {
                    debug!(target: "ceiling::executor", command = name, status = response.status, error = %err, "Command rejected");
                }
                response
            }
        }
    }

    /// Decode one JSON command and render its response.
    ///
    /// A payload that does not decode to a `Command` yields a 400.
    pub fn respond_json(&self, line: &str) -> Response {
        match serde_json::from_str::<Command>(line) {
            Ok(cmd) => self.respond(cmd),
            Err(e) => Response::from_error(&Error::Serialization {
                reason: e.to_string(),
            }),
        }
    }
}
