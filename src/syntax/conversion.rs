use super::tree::FunctionSource;
use crate::error::SyntaxConversionError;

/// A trait for external parser outputs that can be lowered into the
/// canonical [`FunctionSource`] model.
///
/// Parsing itself is out of scope for this crate; implement this trait on
/// whatever structures your front end produces to hand function bodies to
/// the analyzer.
///
/// # Example
///
/// ```rust,no_run
/// use keiro::prelude::*;
/// use keiro::error::SyntaxConversionError;
///
/// struct MyParsedFunction { name: String /* ... */ }
///
/// impl IntoFunctionSource for MyParsedFunction {
///     fn into_function_source(self) -> Result<FunctionSource, SyntaxConversionError> {
///         Ok(FunctionSource {
///             name: self.name,
///             kind: FunctionKind::Function,
///             return_type: None,
///             body: vec![], // lower your statements here
///             line_range: LineRange::default(),
///         })
///     }
/// }
/// ```
pub trait IntoFunctionSource {
    /// Consumes the parsed representation and produces the canonical model.
    fn into_function_source(self) -> Result<FunctionSource, SyntaxConversionError>;
}

impl IntoFunctionSource for FunctionSource {
    fn into_function_source(self) -> Result<FunctionSource, SyntaxConversionError> {
        Ok(self)
    }
}
