//! Integration tests for the public container API.
//!
//! ## Owning container tests
//! - `test_empty_container`: The empty state, its sentinel type, and failing
//!   casts
//! - `test_exact_casts`: Storing and recovering a value by its exact type
//! - `test_clone_deep_copies`: Cloning copies the value into fresh storage
//! - `test_clone_polymorphic_keeps_bases`: Clones of polymorphic containers
//!   still answer base casts
//! - `test_swap_preserves_addresses`: Swapping moves storage handles, not
//!   values
//! - `test_polymorphic_casts`: Casting to declared bases, with mutation
//!   visibility across views
//! - `test_transitive_and_diamond_upcasts`: Bases of bases, and deterministic
//!   resolution when a base is reachable through two paths
//! - `test_cast_error_reporting`: Failed casts name both types involved
//!
//! ## Reference container tests
//! - `test_empty_reference`: The default-constructed empty capture
//! - `test_shared_reference_aliases`: A captured reference points at the
//!   original value, not a copy
//! - `test_mutation_through_reference`: Writes through a captured `&mut`
//!   reach the referent
//! - `test_reference_demotion`: Exclusive captures demote to shared ones,
//!   keeping their provenance
//! - `test_rebinding`: Replacing the captured referent, including with one of
//!   a different type

use core::any::TypeId;

use dynany::{AnyBox, AnyMut, AnyRef, Void, impl_upcast};

#[derive(Clone, Debug, PartialEq)]
struct Base {
    tag: u32,
}

#[derive(Clone, Debug, PartialEq)]
struct Base1 {
    flag: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct Derived {
    base: Base,
    base1: Base1,
    name: &'static str,
}

impl_upcast!(Base);
impl_upcast!(Base1);
impl_upcast!(Derived => base: Base, base1: Base1);

fn test_derived() -> Derived {
    Derived {
        base: Base { tag: 7 },
        base1: Base1 { flag: true },
        name: "derived",
    }
}

#[test]
fn test_empty_container() {
    let container = AnyBox::empty();

    assert!(container.is_empty());
    assert_eq!(container.type_id(), TypeId::of::<Void>());
    assert!(container.downcast_ref::<i32>().is_none());
    assert!(container.cast_ref::<String>().is_err());

    // Cloning an empty container yields another empty one.
    assert!(container.clone().is_empty());
}

#[test]
fn test_exact_casts() {
    let mut container = AnyBox::new(String::from("test message"));

    assert!(!container.is_empty());
    assert_eq!(container.type_id(), TypeId::of::<String>());
    assert_eq!(container.cast_ref::<String>().unwrap(), "test message");

    // A non-polymorphic value only answers for its exact type.
    assert!(container.downcast_ref::<i32>().is_none());
    assert!(container.downcast_ref::<&str>().is_none());

    // The value form hands out an independent copy.
    let copied: String = container.cast().unwrap();
    assert_eq!(copied, "test message");

    container.downcast_mut::<String>().unwrap().push('!');
    assert_eq!(container.cast_ref::<String>().unwrap(), "test message!");
    assert_eq!(copied, "test message");
}

#[test]
fn test_clone_deep_copies() {
    let mut original = AnyBox::new(vec![1i32, 2, 3]);
    let copy = original.clone();

    let original_value = original.cast_ref::<Vec<i32>>().unwrap();
    let copied_value = copy.cast_ref::<Vec<i32>>().unwrap();
    assert_eq!(original_value, copied_value);
    assert!(!core::ptr::eq(original_value, copied_value));

    // Mutating one container must not affect the other.
    original.downcast_mut::<Vec<i32>>().unwrap().push(4);
    assert_eq!(copy.cast_ref::<Vec<i32>>().unwrap(), &[1, 2, 3]);
}

#[test]
fn test_clone_polymorphic_keeps_bases() {
    let original = AnyBox::new_polymorphic(test_derived());
    let copy = original.clone();
    drop(original);

    assert_eq!(copy.cast_ref::<Base>().unwrap().tag, 7);
    assert_eq!(copy.cast_ref::<Derived>().unwrap().name, "derived");
}

#[test]
fn test_swap_preserves_addresses() {
    let mut left = AnyBox::new(String::from("left"));
    let mut right = AnyBox::new(10i32);

    let left_addr: *const String = left.cast_ref::<String>().unwrap();
    let right_addr: *const i32 = right.cast_ref::<i32>().unwrap();

    left.swap(&mut right);

    // Only the handles moved; the values stayed where they were.
    assert!(core::ptr::eq(right.cast_ref::<String>().unwrap(), left_addr));
    assert!(core::ptr::eq(left.cast_ref::<i32>().unwrap(), right_addr));

    // Swapping back restores the original assignment.
    left.swap(&mut right);
    assert_eq!(left.cast_ref::<String>().unwrap(), "left");
    assert_eq!(right.cast_ref::<i32>(), Ok(&10));

    // Swapping with an empty container moves the value over.
    let mut empty = AnyBox::empty();
    left.swap(&mut empty);
    assert!(left.is_empty());
    assert!(core::ptr::eq(empty.cast_ref::<String>().unwrap(), left_addr));
}

#[test]
fn test_polymorphic_casts() {
    let mut container = AnyBox::new_polymorphic(test_derived());

    // The exact type and both declared bases are reachable.
    assert_eq!(container.cast_ref::<Derived>().unwrap().name, "derived");
    assert_eq!(container.cast_ref::<Base>().unwrap().tag, 7);
    assert!(container.cast_ref::<Base1>().unwrap().flag);

    // Unrelated types are not.
    assert!(container.downcast_ref::<String>().is_none());
    assert!(container.downcast_ref::<u32>().is_none());

    // The base views alias the embedded fields.
    let derived_addr: *const Base = &container.cast_ref::<Derived>().unwrap().base;
    assert!(core::ptr::eq(
        container.cast_ref::<Base>().unwrap(),
        derived_addr
    ));

    // Mutation through a base view is visible through the derived view.
    container.downcast_mut::<Base>().unwrap().tag = 8;
    assert_eq!(container.cast_ref::<Derived>().unwrap().base.tag, 8);
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

impl_upcast!(Shared);
impl_upcast!(Left => shared: Shared);
impl_upcast!(Right => shared: Shared);
impl_upcast!(Diamond => left: Left, right: Right);

#[test]
fn test_transitive_and_diamond_upcasts() {
    let container = AnyBox::new_polymorphic(Diamond {
        left: Left {
            shared: Shared { id: 1 },
        },
        right: Right {
            shared: Shared { id: 2 },
        },
    });

    // Bases of bases are reachable.
    assert!(container.downcast_ref::<Left>().is_some());
    assert!(container.downcast_ref::<Right>().is_some());

    // When the same base is reachable through two paths, the first declared
    // path wins.
    assert_eq!(container.cast_ref::<Shared>().unwrap().id, 1);
}

#[test]
fn test_cast_error_reporting() {
    let container = AnyBox::new(5i32);
    let error = container.cast_ref::<String>().unwrap_err();

    assert_eq!(error.requested_type(), core::any::type_name::<String>());
    assert_eq!(error.stored_type(), core::any::type_name::<i32>());

    let rendered = format!("{error}");
    assert!(rendered.contains("String"));
    assert!(rendered.contains("i32"));
}

#[test]
fn test_empty_reference() {
    let reference = AnyRef::empty();
    assert!(reference.is_empty());
    assert_eq!(reference.type_id(), TypeId::of::<Void>());
    assert!(reference.get::<i32>().is_none());
    assert!(reference.cast::<String>().is_err());

    // Rebinding fills the empty container.
    let value = 3i32;
    let mut reference = AnyRef::default();
    reference.rebind(&value);
    assert_eq!(reference.get::<i32>(), Some(&3));
}

#[test]
fn test_shared_reference_aliases() {
    let value = 10i32;
    let reference = AnyRef::new(&value);

    assert_eq!(reference.type_id(), TypeId::of::<i32>());
    assert!(!reference.is_mut());
    assert!(core::ptr::eq(reference.get::<i32>().unwrap(), &value));

    // Copies alias the same referent.
    let copy = reference;
    assert!(core::ptr::eq(
        copy.get::<i32>().unwrap(),
        reference.get::<i32>().unwrap()
    ));

    let error = reference.cast::<String>().unwrap_err();
    assert_eq!(error.requested_type(), core::any::type_name::<String>());
    assert_eq!(error.captured_type(), core::any::type_name::<i32>());
}

#[test]
fn test_mutation_through_reference() {
    let mut value = 10i32;
    {
        let mut reference = AnyMut::new(&mut value);
        assert_eq!(reference.type_id(), TypeId::of::<i32>());
        assert!(reference.get_mut::<u32>().is_none());

        *reference.get_mut::<i32>().unwrap() += 1;
        assert_eq!(reference.get::<i32>(), Some(&11));
    }
    assert_eq!(value, 11);

    // The consuming form hands out the reference for the full lifetime.
    let through: &mut i32 = AnyMut::new(&mut value).into_mut().unwrap();
    *through += 1;
    assert_eq!(value, 12);
}

#[test]
fn test_reference_demotion() {
    let mut value = 10i32;
    let mut reference = AnyMut::new(&mut value);

    {
        // Temporary demotion: shared views that all alias the referent.
        let shared = reference.as_ref();
        let copy = shared;
        assert!(core::ptr::eq(
            shared.get::<i32>().unwrap(),
            copy.get::<i32>().unwrap()
        ));
        assert!(shared.is_mut());
    }

    // Mutable access resumes once the shared views are gone.
    *reference.get_mut::<i32>().unwrap() += 1;

    // Permanent demotion consumes the exclusive capture.
    let shared = reference.into_ref();
    assert!(shared.is_mut());
    assert_eq!(shared.get::<i32>(), Some(&11));
}

#[test]
fn test_rebinding() {
    let first = 1i32;
    let second = "second";
    let mut reference = AnyRef::new(&first);
    reference.rebind(&second);
    assert_eq!(reference.get::<&str>(), Some(&"second"));

    let mut a = 1i32;
    let mut b = 2i64;
    let mut reference = AnyMut::new(&mut a);
    reference.rebind(&mut b);
    assert_eq!(reference.type_id(), TypeId::of::<i64>());
    *reference.get_mut::<i64>().unwrap() += 1;
    drop(reference);
    assert_eq!(a, 1);
    assert_eq!(b, 3);
}

#[test]
fn test_auto_traits() {
    static_assertions::assert_not_impl_any!(AnyBox: Send, Sync);
    static_assertions::assert_not_impl_any!(AnyRef<'_>: Send, Sync);
    static_assertions::assert_not_impl_any!(AnyMut<'_>: Copy, Clone, Send, Sync);
    static_assertions::assert_impl_all!(AnyRef<'static>: Copy, Clone);
}
