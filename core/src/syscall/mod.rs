//! Parsed syscall descriptor records.

pub mod parser;

use stubgen_abi::{nr_macro_name, ArchFlags, ParamWidth};

/// Parameter list of a descriptor entry.
///
/// An empty parenthesis pair is `Void`; it consumes no registers and is
/// rendered as `void` in C declarations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamList {
    Void,
    Types(Vec<String>),
}

impl ParamList {
    /// Raw parameter texts in call order, exactly as written.
    pub fn as_slice(&self) -> &[String] {
        match self {
            ParamList::Void => &[],
            ParamList::Types(types) => types,
        }
    }

    pub fn widths(&self) -> Vec<ParamWidth> {
        self.as_slice()
            .iter()
            .map(|raw| ParamWidth::classify(raw))
            .collect()
    }

    /// C parameter list text for a prototype.
    pub fn render(&self) -> String {
        match self {
            ParamList::Void => "void".to_string(),
            ParamList::Types(types) => types.join(","),
        }
    }
}

/// One descriptor entry.
///
/// Built once by the parser and read-only afterwards; derived values such as
/// the kernel numeric-id macro name are computed on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyscallSpec {
    line: usize,
    name: String,
    func: String,
    aliases: Vec<String>,
    params: ParamList,
    return_type: String,
    dispatch_id: Option<u32>,
    arches: ArchFlags,
}

impl SyscallSpec {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        line: usize,
        name: String,
        func: String,
        aliases: Vec<String>,
        params: ParamList,
        return_type: String,
        dispatch_id: Option<u32>,
        arches: ArchFlags,
    ) -> Self {
        Self {
            line,
            name,
            func,
            aliases,
            params,
            return_type,
            dispatch_id,
            arches,
        }
    }

    /// Descriptor line this entry came from.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Kernel-visible syscall name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exported C symbol implementing the wrapper.
    #[inline]
    pub fn func(&self) -> &str {
        &self.func
    }

    #[inline]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    #[inline]
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    #[inline]
    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    /// Slot in a multiplexed (socketcall-style) syscall family.
    #[inline]
    pub fn dispatch_id(&self) -> Option<u32> {
        self.dispatch_id
    }

    #[inline]
    pub fn arches(&self) -> ArchFlags {
        self.arches
    }

    /// Macro naming the kernel's number for this syscall, e.g. `__NR_write`.
    pub fn nr_macro(&self) -> String {
        nr_macro_name(&self.name)
    }

    /// C prototype of the wrapper.
    pub fn declaration(&self) -> String {
        format!(
            "{:<15}  {} ({});",
            self.return_type,
            self.func,
            self.params.render()
        )
    }
}
