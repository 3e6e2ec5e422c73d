use crate::di::Container;

/// A batch of binding declarations, run once at setup time
///
/// Each binding call returns a `Result` the installer may inspect; the
/// container does not collect them.
///
/// # Example
/// ```rust,ignore
/// use meshject::prelude::*;
///
/// struct PrinterInstaller;
///
/// impl Installer for PrinterInstaller {
///     fn on_binding(&self, container: &mut Container) {
///         if let Err(e) = container.bind::<dyn Printer>().to::<ConsolePrinter>().from_new().as_cached() {
///             tracing::error!("Printer binding rejected: {}", e);
///         }
///     }
/// }
///
/// let mut injector = Injector::new();
/// injector
///     .install(PrinterInstaller)
///     .install(|c: &mut Container| {
///         let _ = c.bind::<Clock>().as_single();
///     });
/// ```
pub trait Installer {
    fn on_binding(&self, container: &mut Container);
}

impl<F> Installer for F
where
    F: Fn(&mut Container),
{
    fn on_binding(&self, container: &mut Container) {
        self(container)
    }
}
