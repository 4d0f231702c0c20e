//! Proc macros for tidact: `view!` JSX-like element trees.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `tidact`.

use proc_macro::TokenStream;

mod view_macro;

/// JSX-like element tree macro.
///
/// Expands into [`create_element`] calls and evaluates to a single `Element`.
///
/// # Syntax
///
/// - `<tag />` - element with no children
/// - `<tag attr="val"> ... </tag>` - element with children
/// - `attr={expr}` - any expression convertible into `AttrValue`
/// - `"text"` - a text child
/// - `{expr}` - any expression convertible into `Child`
///
/// Attribute names may contain hyphens (`data-id="1"`).
///
/// # Example
///
/// ```ignore
/// let tree = view! {
///     <div id="10" style={AttrValue::style([("background", "salmon")])}>
///         <div id="20">"Hello, Worlds"</div>
///     </div>
/// };
/// ```
///
/// [`create_element`]: https://docs.rs/tidact/latest/tidact/element/fn.create_element.html
#[proc_macro]
pub fn view(input: TokenStream) -> TokenStream {
    view_macro::view_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
