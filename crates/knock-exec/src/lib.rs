mod error;
pub use error::ExecError;

mod util;

pub mod command;
pub use command::CommandTask;

mod registry;
pub use registry::build_registry;

pub mod prelude {
    pub use crate::CommandTask;
    pub use crate::build_registry;
    pub use crate::error::ExecError;
}
