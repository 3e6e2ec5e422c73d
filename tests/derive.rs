//! `#[derive(Injectable)]` wiring

use meshject::prelude::*;
use meshject::InjectionKind;

pub trait Clock {
    fn now(&self) -> u64;
}

pub struct FixedClock(u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

impl From<u64> for FixedClock {
    fn from(t: u64) -> Self {
        FixedClock(t)
    }
}

impl meshject::Injectable for FixedClock {
    fn construct(_container: &Container) -> Option<Self> {
        Some(FixedClock(0))
    }
}

interface!(dyn Clock);
implements!(FixedClock => dyn Clock);

fn clocks() -> Injector {
    let mut injector = Injector::new();
    injector.install(|c: &mut Container| {
        c.bind::<dyn Clock>()
            .to::<FixedClock>()
            .with_args(10u64)
            .as_cached()
            .unwrap();
        c.bind_id::<dyn Clock>(1)
            .to::<FixedClock>()
            .with_args(20u64)
            .as_cached()
            .unwrap();
    });
    injector
}

#[derive(Default, Injectable)]
struct TwoClocks {
    #[inject]
    primary: Option<Rc<dyn Clock>>,
    #[inject(id = 1)]
    secondary: Option<Rc<dyn Clock>>,
    untouched: u32,
}

#[test]
fn derive_injects_fields_by_discriminator() {
    let clocks_seen = clocks().instantiate::<TwoClocks>().unwrap();

    assert_eq!(clocks_seen.primary.as_ref().unwrap().now(), 10);
    assert_eq!(clocks_seen.secondary.as_ref().unwrap().now(), 20);
    assert_eq!(clocks_seen.untouched, 0);
}

#[derive(Injectable)]
#[injectable(constructor = "new")]
struct Stamped {
    clock: Rc<dyn Clock>,
    #[inject(id = 1)]
    backup: Option<Rc<dyn Clock>>,
}

impl Stamped {
    fn new(clock: Option<Rc<dyn Clock>>) -> Option<Self> {
        Some(Stamped {
            clock: clock?,
            backup: None,
        })
    }
}

#[test]
fn derive_uses_named_constructor() {
    let stamped = clocks().resolve::<Stamped>().unwrap();

    assert_eq!(stamped.clock.now(), 10);
    assert_eq!(stamped.backup.as_ref().unwrap().now(), 20);
}

#[test]
fn derive_constructor_fails_soft_without_dependency() {
    let injector = Injector::new();
    assert!(injector.resolve::<Stamped>().is_none());
}

#[derive(Default, Injectable)]
#[injectable(method(name = "set_clocks", ids(1, 0)), handler = "on_inject")]
struct Journal {
    #[inject]
    field_clock: Option<Rc<dyn Clock>>,
    order: Vec<&'static str>,
    sum: u64,
}

impl Journal {
    fn set_clocks(&mut self, first: Option<Rc<dyn Clock>>, second: Option<Rc<dyn Clock>>) {
        assert!(self.field_clock.is_some(), "fields run before methods");
        self.order.push("method");
        self.sum = first.map_or(0, |c| c.now() * 100) + second.map_or(0, |c| c.now());
    }

    fn on_inject(&mut self, container: &Container) {
        self.order.push("handler");
        if container.resolve_id::<dyn Clock>(7).is_none() {
            self.order.push("no clock 7");
        }
    }
}

#[test]
fn derive_runs_method_then_handler() {
    let journal = clocks().instantiate::<Journal>().unwrap();

    assert_eq!(journal.sum, 2010);
    assert_eq!(journal.order, vec!["method", "handler", "no clock 7"]);
}

#[test]
fn derive_declares_points_in_dispatch_order() {
    let descriptors = <Journal as meshject::Injectable>::injection_points().descriptors();
    let kinds: Vec<_> = descriptors.iter().map(|d| d.kind).collect();

    assert_eq!(
        kinds,
        vec![
            InjectionKind::Field,
            InjectionKind::Method,
            InjectionKind::Trait
        ]
    );
    assert_eq!(descriptors[0].target, "field_clock");
    assert_eq!(descriptors[1].target, "set_clocks");
    assert_eq!(descriptors[1].ids, vec![1, 0]);
}

#[derive(Injectable)]
struct Marker;

impl Default for Marker {
    fn default() -> Self {
        Marker
    }
}

#[test]
fn derive_supports_unit_structs() {
    let injector = Injector::new();
    assert!(injector.resolve::<Marker>().is_some());
    assert!(<Marker as meshject::Injectable>::injection_points().is_empty());
}
