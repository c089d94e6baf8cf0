/// One-byte record tags. The numbering is part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    None = 1,
    Int = 2,
    Long = 3,
    Float = 4,
    Bool = 5,
    Str = 6,
    ListOfPrimitives = 7,
    Tuple = 8,
    PackedHomogenousData = 9,
    List = 10,
    File = 11,
    Dict = 12,
    RemotePyObject = 13,
    BuiltinExceptionInstance = 14,
    NamedSingleton = 15,
    Function = 16,
    Class = 17,
    Unconvertible = 18,
    ClassInstance = 19,
    InstanceMethod = 20,
    WithBlock = 21,
    PyAbortException = 22,
    StacktraceAsJson = 23,
    UnresolvedSymbol = 24,
}

impl Tag {
    pub fn from_u8(byte: u8) -> Option<Self> {
        use Tag::*;
        Some(match byte {
            1 => None,
            2 => Int,
            3 => Long,
            4 => Float,
            5 => Bool,
            6 => Str,
            7 => ListOfPrimitives,
            8 => Tuple,
            9 => PackedHomogenousData,
            10 => List,
            11 => File,
            12 => Dict,
            13 => RemotePyObject,
            14 => BuiltinExceptionInstance,
            15 => NamedSingleton,
            16 => Function,
            17 => Class,
            18 => Unconvertible,
            19 => ClassInstance,
            20 => InstanceMethod,
            21 => WithBlock,
            22 => PyAbortException,
            23 => StacktraceAsJson,
            24 => UnresolvedSymbol,
            _ => return Option::None,
        })
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            Tag::None
                | Tag::Int
                | Tag::Long
                | Tag::Float
                | Tag::Bool
                | Tag::Str
                | Tag::ListOfPrimitives
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::None => "None",
            Tag::Int => "Int",
            Tag::Long => "Long",
            Tag::Float => "Float",
            Tag::Bool => "Bool",
            Tag::Str => "Str",
            Tag::ListOfPrimitives => "ListOfPrimitives",
            Tag::Tuple => "Tuple",
            Tag::PackedHomogenousData => "PackedHomogenousData",
            Tag::List => "List",
            Tag::File => "File",
            Tag::Dict => "Dict",
            Tag::RemotePyObject => "RemotePyObject",
            Tag::BuiltinExceptionInstance => "BuiltinExceptionInstance",
            Tag::NamedSingleton => "NamedSingleton",
            Tag::Function => "Function",
            Tag::Class => "Class",
            Tag::Unconvertible => "Unconvertible",
            Tag::ClassInstance => "ClassInstance",
            Tag::InstanceMethod => "InstanceMethod",
            Tag::WithBlock => "WithBlock",
            Tag::PyAbortException => "PyAbortException",
            Tag::StacktraceAsJson => "StacktraceAsJson",
            Tag::UnresolvedSymbol => "UnresolvedSymbol",
        }
    }
}
