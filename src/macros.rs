//! Accessor generation for the page-wide signal table.

/// Emit getter functions over the fields of [`crate::global_state::Globals`].
///
/// Each `name => field: Type` row becomes a `fn name() -> RwSignal<Type>`
/// reading the lazily built table, so call sites never reach into the struct:
///
/// ```ignore
/// global_signals! {
///     pub exporting => exporting: bool,
/// }
/// ```
#[macro_export]
macro_rules! global_signals {
    ( $( $vis:vis $name:ident => $field:ident : $ty:ty ),+ $(,)? ) => {
        $(
            $vis fn $name() -> ::leptos::RwSignal<$ty> {
                $crate::global_state::globals().$field
            }
        )+
    };
}
