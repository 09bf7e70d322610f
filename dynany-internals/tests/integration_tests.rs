//! Integration tests for the dynany-internals crate.
//!
//! This test suite exercises the raw layer the way the `dynany` crate uses
//! it:
//!
//! ## Cell tests
//! - `test_cell_creation_and_type_identity`: Direct cell creation, type
//!   checking, and exact-match upcasts
//! - `test_cell_clone_independence`: Deep cloning through the vtable
//! - `test_cell_mutation_through_upcast`: Mutable projection and reborrowing
//! - `test_polymorphic_cell_base_projection`: Base recovery through a
//!   declared compatibility graph, including multiple bases
//! - `test_polymorphic_cell_diamond`: Deterministic resolution when the same
//!   base is reachable through two paths
//!
//! ## Binding tests
//! - `test_binding_capture_and_identity`: Const/mutable capture tags and type
//!   identity
//! - `test_binding_aliases_referent`: The binding points at the original
//!   storage, not a copy

use core::any::{Any, TypeId};

use dynany_internals::{Mutability, RawBinding, RawCell, upcast::Upcast};

#[derive(Clone, PartialEq, Debug)]
struct Engine {
    horsepower: u32,
}

#[derive(Clone, PartialEq, Debug)]
struct Chassis {
    wheels: u8,
}

#[derive(Clone, PartialEq, Debug)]
struct Car {
    engine: Engine,
    chassis: Chassis,
    name: &'static str,
}

impl Upcast for Engine {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        (target == TypeId::of::<Engine>()).then_some(self as &dyn Any)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        (target == TypeId::of::<Engine>()).then_some(self as &mut dyn Any)
    }
}

impl Upcast for Chassis {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        (target == TypeId::of::<Chassis>()).then_some(self as &dyn Any)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        (target == TypeId::of::<Chassis>()).then_some(self as &mut dyn Any)
    }
}

impl Upcast for Car {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        if target == TypeId::of::<Car>() {
            return Some(self);
        }
        if let Some(value) = self.engine.upcast(target) {
            return Some(value);
        }
        self.chassis.upcast(target)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        if target == TypeId::of::<Car>() {
            return Some(self);
        }
        if self.engine.upcast(target).is_some() {
            return self.engine.upcast_mut(target);
        }
        self.chassis.upcast_mut(target)
    }
}

fn test_car() -> Car {
    Car {
        engine: Engine { horsepower: 90 },
        chassis: Chassis { wheels: 4 },
        name: "2cv",
    }
}

#[test]
fn test_cell_creation_and_type_identity() {
    let cell = RawCell::new_direct(String::from("test message"));
    let cell_ref = cell.as_ref();

    assert_eq!(cell_ref.value_type_id(), TypeId::of::<String>());
    assert_eq!(cell_ref.value_type_name(), core::any::type_name::<String>());

    let value = cell_ref.upcast(TypeId::of::<String>()).unwrap();
    assert_eq!(value.downcast_ref::<String>().unwrap(), "test message");

    // A direct cell only answers for the exact stored type.
    assert!(cell_ref.upcast(TypeId::of::<&str>()).is_none());
    assert!(cell_ref.upcast(TypeId::of::<i32>()).is_none());
}

#[test]
fn test_cell_clone_independence() {
    let cell = RawCell::new_direct(vec![1u8, 2, 3]);
    let copy = cell.as_ref().clone_cell();

    let original = cell
        .as_ref()
        .upcast(TypeId::of::<Vec<u8>>())
        .and_then(|any| any.downcast_ref::<Vec<u8>>())
        .unwrap();
    let cloned = copy
        .as_ref()
        .upcast(TypeId::of::<Vec<u8>>())
        .and_then(|any| any.downcast_ref::<Vec<u8>>())
        .unwrap();

    assert_eq!(original, cloned);
    assert!(!core::ptr::eq(original, cloned));

    // Dropping the original must leave the clone intact.
    drop(cell);
    let cloned = copy
        .as_ref()
        .upcast(TypeId::of::<Vec<u8>>())
        .and_then(|any| any.downcast_ref::<Vec<u8>>())
        .unwrap();
    assert_eq!(cloned, &[1, 2, 3]);
}

#[test]
fn test_cell_mutation_through_upcast() {
    let mut cell = RawCell::new_direct(10i64);
    {
        let value = cell.as_mut().upcast_mut(TypeId::of::<i64>()).unwrap();
        *value.downcast_mut::<i64>().unwrap() *= 10;
    }
    let value = cell.as_ref().upcast(TypeId::of::<i64>()).unwrap();
    assert_eq!(value.downcast_ref::<i64>(), Some(&100));
}

#[test]
fn test_polymorphic_cell_base_projection() {
    let cell = RawCell::new_polymorphic(test_car());
    let cell_ref = cell.as_ref();

    // Exact type still works.
    let car = cell_ref
        .upcast(TypeId::of::<Car>())
        .and_then(|any| any.downcast_ref::<Car>())
        .unwrap();
    assert_eq!(car.name, "2cv");

    // Both declared bases are reachable, and they alias the embedded fields.
    let engine = cell_ref
        .upcast(TypeId::of::<Engine>())
        .and_then(|any| any.downcast_ref::<Engine>())
        .unwrap();
    assert_eq!(engine.horsepower, 90);
    assert!(core::ptr::eq(engine, &car.engine));

    let chassis = cell_ref
        .upcast(TypeId::of::<Chassis>())
        .and_then(|any| any.downcast_ref::<Chassis>())
        .unwrap();
    assert_eq!(chassis.wheels, 4);

    // Unrelated types fail.
    assert!(cell_ref.upcast(TypeId::of::<String>()).is_none());
    assert!(cell_ref.upcast(TypeId::of::<u32>()).is_none());
}

#[test]
fn test_polymorphic_cell_mutation_through_base() {
    let mut cell = RawCell::new_polymorphic(test_car());
    {
        let engine = cell.as_mut().upcast_mut(TypeId::of::<Engine>()).unwrap();
        engine.downcast_mut::<Engine>().unwrap().horsepower = 120;
    }
    let car = cell
        .as_ref()
        .upcast(TypeId::of::<Car>())
        .and_then(|any| any.downcast_ref::<Car>())
        .unwrap();
    assert_eq!(car.engine.horsepower, 120);
}

#[derive(Clone)]
struct Shared {
    id: u32,
}

#[derive(Clone)]
struct Left {
    shared: Shared,
}

#[derive(Clone)]
struct Right {
    shared: Shared,
}

#[derive(Clone)]
struct Diamond {
    left: Left,
    right: Right,
}

impl Upcast for Shared {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        (target == TypeId::of::<Shared>()).then_some(self as &dyn Any)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        (target == TypeId::of::<Shared>()).then_some(self as &mut dyn Any)
    }
}

impl Upcast for Left {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        if target == TypeId::of::<Left>() {
            return Some(self);
        }
        self.shared.upcast(target)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        if target == TypeId::of::<Left>() {
            return Some(self);
        }
        self.shared.upcast_mut(target)
    }
}

impl Upcast for Right {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        if target == TypeId::of::<Right>() {
            return Some(self);
        }
        self.shared.upcast(target)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        if target == TypeId::of::<Right>() {
            return Some(self);
        }
        self.shared.upcast_mut(target)
    }
}

impl Upcast for Diamond {
    fn upcast(&self, target: TypeId) -> Option<&dyn Any> {
        if target == TypeId::of::<Diamond>() {
            return Some(self);
        }
        if let Some(value) = self.left.upcast(target) {
            return Some(value);
        }
        self.right.upcast(target)
    }

    fn upcast_mut(&mut self, target: TypeId) -> Option<&mut dyn Any> {
        if target == TypeId::of::<Diamond>() {
            return Some(self);
        }
        if self.left.upcast(target).is_some() {
            return self.left.upcast_mut(target);
        }
        self.right.upcast_mut(target)
    }
}

#[test]
fn test_polymorphic_cell_diamond() {
    let diamond = Diamond {
        left: Left {
            shared: Shared { id: 1 },
        },
        right: Right {
            shared: Shared { id: 2 },
        },
    };
    let cell = RawCell::new_polymorphic(diamond);
    let cell_ref = cell.as_ref();

    // The shared base is reachable through both paths; the first declared
    // path wins.
    let shared = cell_ref
        .upcast(TypeId::of::<Shared>())
        .and_then(|any| any.downcast_ref::<Shared>())
        .unwrap();
    assert_eq!(shared.id, 1);

    // Intermediate bases are reachable as well.
    assert!(cell_ref.upcast(TypeId::of::<Left>()).is_some());
    assert!(cell_ref.upcast(TypeId::of::<Right>()).is_some());
}

#[test]
fn test_binding_capture_and_identity() {
    let text = String::from("bound");
    let binding = RawBinding::bind_ref(&text);
    assert_eq!(binding.binding_type_id(), TypeId::of::<String>());
    assert_eq!(
        binding.binding_type_name(),
        core::any::type_name::<String>()
    );
    assert_eq!(binding.mutability(), Mutability::Const);

    let mut number = 7u16;
    let binding = RawBinding::bind_mut(&mut number);
    assert_eq!(binding.binding_type_id(), TypeId::of::<u16>());
    assert_eq!(binding.mutability(), Mutability::Mutable);
}

#[test]
fn test_binding_aliases_referent() {
    let mut number = 7u16;
    let address = &raw const number;
    {
        let binding = RawBinding::bind_mut(&mut number);
        // SAFETY: The binding captures a `u16` from a `&mut` and no other
        // references derived from it are live
        let through_binding: &mut u16 = unsafe { binding.downcast_mut_unchecked::<u16>() };
        assert!(core::ptr::eq(through_binding, address));
        *through_binding = 9;
    }
    assert_eq!(number, 9);
}
