//! The built-in function table.
//!
//! Calls whose callee is a bare name in this table emit a fixed C++
//! template instead of a mangled call. Anything not listed falls
//! through to regular call syntax.

use rustc_hash::FxHashMap;

/// How a built-in call is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltinCall {
    /// `std::cout << a << " " << b << std::endl`
    Print,
    /// `std::cin >> a`
    Input,
    /// `Builtin::<name>(args)`
    Namespace(&'static str),
    /// Collection constructor: `List(args)`, `Set(args)`, `Map(args)`
    Wrapper(&'static str),
}

/// Build the name-to-template table.
pub fn builtin_map() -> FxHashMap<&'static str, BuiltinCall> {
    let mut map = FxHashMap::default();
    // I/O
    map.insert("print", BuiltinCall::Print);
    map.insert("input", BuiltinCall::Input);
    // Sequence and numeric helpers
    for name in [
        "len", "sum", "min", "max", "iter", "next", "abs", "round", "pow", "str", "int", "float",
        "tuple",
    ] {
        map.insert(name, BuiltinCall::Namespace(name));
    }
    // Collection constructors
    map.insert("list", BuiltinCall::Wrapper("List"));
    map.insert("set", BuiltinCall::Wrapper("Set"));
    map.insert("dict", BuiltinCall::Wrapper("Map"));
    map
}

/// Render one built-in call from its already-rendered argument list.
pub fn translate(call: BuiltinCall, args: &[String]) -> String {
    match call {
        BuiltinCall::Print => {
            if args.is_empty() {
                "std::cout << std::endl".to_string()
            } else {
                format!("std::cout << {} << std::endl", args.join(" << \" \" << "))
            }
        },
        BuiltinCall::Input => match args.first() {
            Some(arg) => format!("std::cin >> {arg}"),
            None => "std::cin".to_string(),
        },
        BuiltinCall::Namespace(name) => format!("Builtin::{name}({})", args.join(", ")),
        BuiltinCall::Wrapper(name) => format!("{name}({})", args.join(", ")),
    }
}
