use super::*;

#[test]
fn interning_is_deduplicated() {
    let mut interner = Interner::new();
    let a1 = interner.intern("hello");
    let a2 = interner.intern("hello");
    assert_eq!(a1, a2);
    assert_eq!(interner.resolve(a1), "hello");
}

#[test]
fn empty_string_is_the_none_atom() {
    let mut interner = Interner::new();
    assert_eq!(interner.intern(""), Atom::NONE);
    assert!(Atom::NONE.is_none());
    assert_eq!(interner.resolve(Atom::NONE), "");
}

#[test]
fn common_strings_are_pre_interned() {
    let interner = Interner::new();
    let default = interner.lookup("default").expect("pre-interned");
    assert_eq!(interner.resolve(default), "default");
    assert!(interner.lookup("not-interned-yet").is_none());
}

#[test]
fn unknown_atom_resolves_to_empty() {
    let interner = Interner::new();
    assert_eq!(interner.resolve(Atom(9_999)), "");
}
