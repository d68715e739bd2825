//! Kernel numeric-id macro naming.

/// Prefix of the standard kernel syscall number macros.
pub const NR_PREFIX: &str = "__NR_";

/// Prefix reserved for non-standard ARM-private calls such as
/// `__ARM_NR_cacheflush`; these already are complete macro names.
pub const ARM_PRIVATE_NR_PREFIX: &str = "__ARM_NR_";

/// Name of the macro holding the kernel number for syscall `name`.
pub fn nr_macro_name(name: &str) -> String {
    if name.starts_with(ARM_PRIVATE_NR_PREFIX) {
        name.to_string()
    } else {
        format!("{NR_PREFIX}{name}")
    }
}
