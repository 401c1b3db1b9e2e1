use thiserror::Error;
use xtalgrid::core::io::menu::MenuLoadError;
use xtalgrid::workflows::optimize::OptimizeError;
use xtalgrid::workflows::params::ParamsLoadError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Menu(#[from] MenuLoadError),

    #[error(transparent)]
    Params(#[from] ParamsLoadError),

    #[error(transparent)]
    Optimize(#[from] OptimizeError),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
