//! Result type alias for the toolbox

use super::errors::ToolboxError;

/// Result type alias for toolbox operations
///
/// # Examples
///
/// ```
/// use weread_toolbox::domain::result::Result;
/// use weread_toolbox::domain::errors::ToolboxError;
///
/// fn failing_function() -> Result<()> {
///     Err(ToolboxError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ToolboxError>;
