mod loader;

pub use loader::{
    ClassConfig, Config, FunctionConfig, LayoutConfig, ReportConfig, SourceConfig, StringConfig,
};
