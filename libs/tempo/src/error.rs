use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, miette::Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Quantity(#[from] metron::Error),

    #[error("setting {setting} is not initialized")]
    #[diagnostic(
        code(tempo::uninitialized),
        help("assign the setting before the first tick, or give it a default")
    )]
    Uninitialized { setting: String },

    #[error("uninitialized settings: {}", .names.join(", "))]
    #[diagnostic(
        code(tempo::uninitialized_settings),
        help("every required setting must be assigned before the loop starts")
    )]
    UninitializedSettings { names: Vec<String> },

    #[error("property {path} is nil")]
    #[diagnostic(code(tempo::nil_property))]
    NilProperty { path: String },

    #[error("unknown module {0}")]
    #[diagnostic(code(tempo::unknown_module))]
    UnknownModule(String),

    #[error("module {module} has no setting {setting}")]
    #[diagnostic(code(tempo::unknown_setting))]
    UnknownSetting { module: String, setting: String },

    #[error("module {module} has no property {path}")]
    #[diagnostic(code(tempo::unknown_property))]
    UnknownProperty { module: String, path: String },

    #[error("cannot connect {input} ({expected}) to {output} ({found})")]
    #[diagnostic(
        code(tempo::property_type_mismatch),
        help("inputs can only be connected to outputs of the same value type")
    )]
    PropertyTypeMismatch {
        input: String,
        output: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("processing loop has not been started")]
    #[diagnostic(
        code(tempo::not_started),
        help("call ProcessingLoop::start before ticking")
    )]
    NotStarted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
