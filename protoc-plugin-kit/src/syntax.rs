/// The `syntax` declared by a `.proto` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Syntax {
    Proto2,
    Proto3,
    Editions,
}

impl Syntax {
    pub fn is_proto3(self) -> bool {
        self == Syntax::Proto3
    }
}

impl From<Option<&str>> for Syntax {
    fn from(optional_str: Option<&str>) -> Self {
        // Anything protoc may add later is treated like proto2.
        match optional_str {
            Some("proto3") => Syntax::Proto3,
            Some("editions") => Syntax::Editions,
            _ => Syntax::Proto2,
        }
    }
}
