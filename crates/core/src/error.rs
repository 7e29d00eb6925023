#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: String },
    #[error("invalid test date (expected YYYY-MM-DD): {0}")]
    InvalidTestDate(String),
    #[error("image is {size} bytes, the maximum is {limit} bytes")]
    ImageTooLarge { size: u64, limit: u64 },
    #[error("unknown category filter: {0}")]
    UnknownCategoryFilter(String),
    #[error("unknown nutrient: {0}")]
    UnknownNutrient(String),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid text: {0}")]
    Text(#[from] labora_types::TextError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
