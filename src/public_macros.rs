/// Defines a local `yield_!` macro yielding through the given capability.
///
/// `yield_!(value)` then stands for `co.yield_(value).await`, which makes
/// forgetting the `.await` impossible.
///
/// ```rust
/// use ::produce_iter::prelude::*;
///
/// let letters = produce(|co| async move {
///     make_yield!(co);
///     for c in "abc".chars() {
///         yield_!(c);
///     }
/// });
/// assert_eq!(letters.collect::<String>(), "abc");
/// ```
#[macro_export]
macro_rules! make_yield {
    (
        @with_dollar![$dol:tt]
        $co:expr
    ) => (
        macro_rules! yield_ {(
            $dol value:expr $dol(,)?
        ) => (
            $crate::YieldCapability::yield_(&$co, $dol value).await
        )}
    );

    (
        $co:expr $(,)?
    ) => (
        $crate::make_yield!(
            @with_dollar![$]
            $co
        )
    )
}
