//! Program fixtures
//!
//! Each fixture builds a small program through `ProgramBuilder` and returns
//! the ids the tests assert on. Java-like source is given in the doc
//! comments.

use codegraph_pta::shared::models::{
    ClassId, FieldId, InvokeKind, MethodId, MethodRef, Program, ProgramBuilder, Type, VarId,
};

/// ```java
/// class A { void foo() {} }
/// class Main { static void main() { A a = new A(); a.foo(); } }
/// ```
pub struct MainFoo {
    pub program: Program,
    pub main: MethodId,
    pub foo: MethodId,
    pub a: VarId,
}

pub fn main_calls_foo() -> MainFoo {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    b.set_object_class(object);
    let class_a = b.add_class("A", Some(object));
    let main_class = b.add_class("Main", Some(object));
    let foo = b.add_method(class_a, "void foo()", false, &[]);
    let main = b.add_method(main_class, "void main()", true, &[]);

    let a = b.var(main, "a");
    b.new_object(main, a, Type::Class(class_a));
    b.invoke(main, InvokeKind::Virtual, MethodRef::new(class_a, "void foo()"), Some(a), &[], None);
    b.add_entry_method(main);

    MainFoo {
        program: b.build().unwrap(),
        main,
        foo,
        a,
    }
}

/// ```java
/// class T { static Object f; }
/// static void store() { T.f = new B(); }
/// static void load()  { x = T.f; }
/// static void main()  { store(); load(); }   // or load(); store();
/// ```
pub struct StaticField {
    pub program: Program,
    pub field: FieldId,
    pub x: VarId,
    pub class_b: ClassId,
}

pub fn static_field_program(store_first: bool) -> StaticField {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let class_t = b.add_class("T", Some(object));
    let class_b = b.add_class("B", Some(object));
    let field = b.add_field(class_t, "f", true);

    let store = b.add_method(class_t, "void store()", true, &[]);
    let tmp = b.var(store, "tmp");
    b.new_object(store, tmp, Type::Class(class_b));
    b.store_static(store, field, tmp);

    let load = b.add_method(class_t, "void load()", true, &[]);
    let x = b.var(load, "x");
    b.load_static(load, x, field);

    let main = b.add_method(class_t, "void main()", true, &[]);
    let order = if store_first {
        ["void store()", "void load()"]
    } else {
        ["void load()", "void store()"]
    };
    for sig in order {
        b.invoke(main, InvokeKind::Static, MethodRef::new(class_t, sig), None, &[], None);
    }
    b.add_entry_method(main);

    StaticField {
        program: b.build().unwrap(),
        field,
        x,
        class_b,
    }
}

/// ```java
/// Object[] a = new Object[3];
/// a[0] = new X(); a[1] = new Y();
/// Object z = a[2];
/// ```
pub struct ArrayStores {
    pub program: Program,
    pub arr: VarId,
    pub x: VarId,
    pub y: VarId,
    pub z: VarId,
}

pub fn array_program() -> ArrayStores {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let class_x = b.add_class("X", Some(object));
    let class_y = b.add_class("Y", Some(object));
    let main = b.add_method(object, "void main()", true, &[]);

    let arr = b.var(main, "a");
    let x = b.var(main, "x");
    let y = b.var(main, "y");
    let z = b.var(main, "z");
    b.new_object(main, arr, Type::array_of(Type::Class(object)));
    b.new_object(main, x, Type::Class(class_x));
    b.new_object(main, y, Type::Class(class_y));
    b.store_array(main, arr, x);
    b.store_array(main, arr, y);
    b.load_array(main, z, arr);
    b.add_entry_method(main);

    ArrayStores {
        program: b.build().unwrap(),
        arr,
        x,
        y,
        z,
    }
}

/// ```java
/// class Box { Object f;
///   void set(Object v) { this.f = v; }
///   Object get() { return this.f; } }
/// static Object id(Object p) { return p; }
/// static void main() {
///   A a = new A(); B b = new B();
///   Object r1 = id(a); Object r2 = id(b);
///   Box b1 = new Box(); Box b2 = new Box();
///   b1.set(a); b2.set(b);
///   Object g1 = b1.get(); Object g2 = b2.get();
/// }
/// ```
pub struct Wrappers {
    pub program: Program,
    pub class_a: ClassId,
    pub class_b: ClassId,
    pub r1: VarId,
    pub r2: VarId,
    pub g1: VarId,
    pub g2: VarId,
    pub main: MethodId,
    pub id: MethodId,
    pub set: MethodId,
}

pub fn wrapper_program() -> Wrappers {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let class_a = b.add_class("A", Some(object));
    let class_b = b.add_class("B", Some(object));
    let class_box = b.add_class("Box", Some(object));
    let main_class = b.add_class("Main", Some(object));
    let f = b.add_field(class_box, "f", false);

    let set = b.add_method(class_box, "void set(Object)", false, &["v"]);
    let set_this = b.this_var(set).unwrap();
    let v = b.param(set, 0).unwrap();
    b.store_field(set, set_this, f, v);

    let get = b.add_method(class_box, "Object get()", false, &[]);
    let get_this = b.this_var(get).unwrap();
    let ret = b.var(get, "ret");
    b.load_field(get, ret, get_this, f);
    b.ret(get, Some(ret));

    let id = b.add_method(main_class, "Object id(Object)", true, &["p"]);
    let p = b.param(id, 0).unwrap();
    b.ret(id, Some(p));

    let main = b.add_method(main_class, "void main()", true, &[]);
    let a = b.var(main, "a");
    let bv = b.var(main, "b");
    let r1 = b.var(main, "r1");
    let r2 = b.var(main, "r2");
    let b1 = b.var(main, "b1");
    let b2 = b.var(main, "b2");
    let g1 = b.var(main, "g1");
    let g2 = b.var(main, "g2");
    let id_ref = MethodRef::new(main_class, "Object id(Object)");
    let set_ref = MethodRef::new(class_box, "void set(Object)");
    let get_ref = MethodRef::new(class_box, "Object get()");

    b.new_object(main, a, Type::Class(class_a));
    b.new_object(main, bv, Type::Class(class_b));
    b.invoke(main, InvokeKind::Static, id_ref.clone(), None, &[a], Some(r1));
    b.invoke(main, InvokeKind::Static, id_ref, None, &[bv], Some(r2));
    b.new_object(main, b1, Type::Class(class_box));
    b.new_object(main, b2, Type::Class(class_box));
    b.invoke(main, InvokeKind::Virtual, set_ref.clone(), Some(b1), &[a], None);
    b.invoke(main, InvokeKind::Virtual, set_ref, Some(b2), &[bv], None);
    b.invoke(main, InvokeKind::Virtual, get_ref.clone(), Some(b1), &[], Some(g1));
    b.invoke(main, InvokeKind::Virtual, get_ref, Some(b2), &[], Some(g2));
    b.add_entry_method(main);

    Wrappers {
        program: b.build().unwrap(),
        class_a,
        class_b,
        r1,
        r2,
        g1,
        g2,
        main,
        id,
        set,
    }
}

/// ```java
/// abstract class Animal { abstract void speak(); }
/// class Dog extends Animal { void speak() {} }
/// class Puppy extends Dog {}
/// class Cat extends Animal { void speak() {} }
/// interface Greeter { void greet(); }
/// class Robot implements Greeter { void greet() {} }
/// static void main() {
///   Animal p = new Puppy(); p.speak();
///   Animal c = new Cat();   c.speak();
///   Greeter g = new Robot(); g.greet();
///   Animal s = new Animal(); s.speak();   // no concrete target
/// }
/// ```
pub struct Dispatch {
    pub program: Program,
    pub dog_speak: MethodId,
    pub cat_speak: MethodId,
    pub animal_speak: MethodId,
    pub robot_greet: MethodId,
    pub main: MethodId,
}

pub fn dispatch_program() -> Dispatch {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    b.set_object_class(object);
    let animal = b.add_abstract_class("Animal", Some(object));
    let dog = b.add_class("Dog", Some(animal));
    let puppy = b.add_class("Puppy", Some(dog));
    let cat = b.add_class("Cat", Some(animal));
    let greeter = b.add_interface("Greeter", &[]);
    let robot = b.add_class("Robot", Some(object));
    b.add_implements(robot, greeter);

    let animal_speak = b.add_abstract_method(animal, "void speak()", &[]);
    let dog_speak = b.add_method(dog, "void speak()", false, &[]);
    let cat_speak = b.add_method(cat, "void speak()", false, &[]);
    b.add_abstract_method(greeter, "void greet()", &[]);
    let robot_greet = b.add_method(robot, "void greet()", false, &[]);

    let main = b.add_method(object, "void main()", true, &[]);
    let p = b.var(main, "p");
    let c = b.var(main, "c");
    let g = b.var(main, "g");
    let s = b.var(main, "s");
    let speak = MethodRef::new(animal, "void speak()");
    b.new_object(main, p, Type::Class(puppy));
    b.invoke(main, InvokeKind::Virtual, speak.clone(), Some(p), &[], None);
    b.new_object(main, c, Type::Class(cat));
    b.invoke(main, InvokeKind::Virtual, speak.clone(), Some(c), &[], None);
    b.new_object(main, g, Type::Class(robot));
    b.invoke(main, InvokeKind::Interface, MethodRef::new(greeter, "void greet()"), Some(g), &[], None);
    b.new_object(main, s, Type::Class(animal));
    b.invoke(main, InvokeKind::Virtual, speak, Some(s), &[], None);
    b.add_entry_method(main);

    Dispatch {
        program: b.build().unwrap(),
        dog_speak,
        cat_speak,
        animal_speak,
        robot_greet,
        main,
    }
}

/// ```java
/// class A { A() {} }
/// class B extends A { B() { super(); } }
/// static void main() { B b = new B(); b.<init>(); }
/// ```
pub struct Constructors {
    pub program: Program,
    pub a_init: MethodId,
    pub b_init: MethodId,
    pub b: VarId,
}

pub fn constructor_program() -> Constructors {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let class_a = b.add_class("A", Some(object));
    let class_b = b.add_class("B", Some(class_a));

    let a_init = b.add_method(class_a, "void <init>()", false, &[]);
    let b_init = b.add_method(class_b, "void <init>()", false, &[]);
    let b_this = b.this_var(b_init).unwrap();
    b.invoke(b_init, InvokeKind::Special, MethodRef::new(class_a, "void <init>()"), Some(b_this), &[], None);

    let main = b.add_method(object, "void main()", true, &[]);
    let bv = b.var(main, "b");
    b.new_object(main, bv, Type::Class(class_b));
    b.invoke(main, InvokeKind::Special, MethodRef::new(class_b, "void <init>()"), Some(bv), &[], None);
    b.add_entry_method(main);

    Constructors {
        program: b.build().unwrap(),
        a_init,
        b_init,
        b: bv,
    }
}

/// `static void f() {}` called as `f(x)`
pub fn arity_mismatch_program() -> Program {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    b.add_method(object, "void f()", true, &[]);
    let main = b.add_method(object, "void main()", true, &[]);
    let x = b.var(main, "x");
    b.new_object(main, x, Type::Class(object));
    b.invoke(main, InvokeKind::Static, MethodRef::new(object, "void f()"), None, &[x], None);
    b.add_entry_method(main);
    b.build().unwrap()
}

/// Linked list built in a loop-free chain of `n` nodes:
/// `n_i = new Node(); n_i.next = n_{i-1};` then walks `next` twice.
pub fn linked_list_program(n: usize) -> Program {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let node = b.add_class("Node", Some(object));
    let next = b.add_field(node, "next", false);
    let main = b.add_method(object, "void main()", true, &[]);

    let mut prev: Option<VarId> = None;
    for i in 0..n {
        let cur = b.var(main, &format!("n{}", i));
        b.new_object(main, cur, Type::Class(node));
        if let Some(p) = prev {
            b.store_field(main, cur, next, p);
        }
        prev = Some(cur);
    }
    if let Some(head) = prev {
        let w1 = b.var(main, "w1");
        let w2 = b.var(main, "w2");
        b.load_field(main, w1, head, next);
        b.load_field(main, w2, w1, next);
    }
    b.add_entry_method(main);
    b.build().unwrap()
}

/// ```java
/// class Base { void run() {} }
/// abstract class Mid extends Base { abstract void run(); }
/// class Leaf extends Mid { void run() { Mid.super.run(); } }
/// static void main() { Mid m = new Leaf(); m.run(); }
/// ```
pub struct SuperCall {
    pub program: Program,
    pub base_run: MethodId,
    pub leaf_run: MethodId,
}

pub fn super_call_program() -> SuperCall {
    let mut b = ProgramBuilder::new();
    let object = b.add_class("Object", None);
    let base = b.add_class("Base", Some(object));
    let mid = b.add_abstract_class("Mid", Some(base));
    let leaf = b.add_class("Leaf", Some(mid));

    let base_run = b.add_method(base, "void run()", false, &[]);
    b.add_abstract_method(mid, "void run()", &[]);
    let leaf_run = b.add_method(leaf, "void run()", false, &[]);
    let this = b.this_var(leaf_run).unwrap();
    b.invoke(leaf_run, InvokeKind::Special, MethodRef::new(mid, "void run()"), Some(this), &[], None);

    let main = b.add_method(object, "void main()", true, &[]);
    let m = b.var(main, "m");
    b.new_object(main, m, Type::Class(leaf));
    b.invoke(main, InvokeKind::Virtual, MethodRef::new(mid, "void run()"), Some(m), &[], None);
    b.add_entry_method(main);

    SuperCall {
        program: b.build().unwrap(),
        base_run,
        leaf_run,
    }
}
