//! Declarative macros for ergonomic effect construction
//!
//! Reducers use these to wrap collaborator calls that feed a result action
//! back into the store.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use paylink_core::async_effect;
///
/// async_effect! {
///     let link = generator.generate(values).await;
///     Some(FormAction::LinkGenerated { attempt, link })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
