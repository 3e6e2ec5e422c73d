use crate::config::ContainerConfig;
use crate::di::{Container, Id, Injectable, Resolvable, Shared};
use crate::error::Result;
use crate::installer::Installer;

/// Entry point owning a [`Container`]
///
/// Run installers first, then resolve. Installers run exactly once, in the
/// order they are installed.
///
/// # Example
/// ```rust,ignore
/// let mut injector = Injector::new();
/// injector.install(CounterInstaller).install(PrinterInstaller);
///
/// let counter = injector.resolve::<dyn Counter>();
/// let app = injector.instantiate::<App>();
/// ```
pub struct Injector {
    container: Container,
    installed: usize,
}

impl Injector {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            container: Container::with_config(config),
            installed: 0,
        }
    }

    /// Run an installer against the container
    pub fn install<I: Installer>(&mut self, installer: I) -> &mut Self {
        let name = std::any::type_name::<I>();
        let before = self.container.len();

        tracing::debug!("Running installer: {}", name);
        installer.on_binding(&mut self.container);
        self.installed += 1;

        tracing::info!(
            "Installer {} complete ({} bindings added)",
            name,
            self.container.len() - before
        );
        self
    }

    pub fn resolve<T: ?Sized + Resolvable>(&self) -> Option<Shared<T>> {
        self.container.resolve::<T>()
    }

    pub fn resolve_id<T: ?Sized + Resolvable>(&self, id: Id) -> Option<Shared<T>> {
        self.container.resolve_id::<T>(id)
    }

    pub fn try_resolve<T: ?Sized + Resolvable>(&self) -> Result<Shared<T>> {
        self.container.try_resolve::<T>()
    }

    pub fn try_resolve_id<T: ?Sized + Resolvable>(&self, id: Id) -> Result<Shared<T>> {
        self.container.try_resolve_id::<T>(id)
    }

    pub fn instantiate<T: Injectable>(&self) -> Option<Shared<T>> {
        self.container.instantiate::<T>()
    }

    pub fn instantiate_with<T, A>(&self, args: A) -> Shared<T>
    where
        T: Injectable + From<A>,
    {
        self.container.instantiate_with::<T, A>(args)
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Number of installers run so far
    pub fn installed(&self) -> usize {
        self.installed
    }

    pub fn into_container(self) -> Container {
        self.container
    }
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}
