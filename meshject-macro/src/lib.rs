use proc_macro::TokenStream;

mod injectable;

/// Derive macro implementing `meshject::Injectable`
///
/// Without options the type is built with `Default::default()`. Every field
/// marked `#[inject]` becomes a field injection point; its type must be
/// `Option<Rc<T>>`.
///
/// Struct options, all under `#[injectable(...)]`:
/// - `constructor = "new"`: constructor injection through `Self::new`, whose
///   parameters are resolved in order and which returns `Option<Self>`
/// - `method(name = "set_pair", ids(0, 1))`: a method injection point, may repeat
/// - `handler = "on_inject"`: the custom handler, `fn(&mut self, &Container)`
///
/// # Example
/// ```rust,ignore
/// use meshject::prelude::*;
///
/// #[derive(Default, Injectable)]
/// #[injectable(method(name = "set_clock"), handler = "on_inject")]
/// pub struct Greeter {
///     #[inject]
///     printer: Option<Rc<dyn Printer>>,
///     #[inject(id = 1)]
///     fallback: Option<Rc<dyn Printer>>,
///     clock: Option<Rc<Clock>>,
/// }
/// ```
#[proc_macro_derive(Injectable, attributes(injectable, inject))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable(input)
}
