mod context;
mod name;
mod registry;
pub mod scalar;

pub use context::FunctionContext;
pub use name::{BuiltinName, FunctionName};
pub use registry::{DefaultFunctionRegistry, FunctionRegistry, FunctionRegistryRef};
