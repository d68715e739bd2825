//! Descriptor language parser.
//!
//! Each logical line describes one wrapper:
//!
//! ```text
//! <return type> <func>[|<alias>,...][:<syscall name>[:<dispatch id>]] ( <params> ) <arch list>
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. A malformed line is
//! reported with its line number and skipped; parsing carries on with the
//! next line.

use std::fs;
use std::path::Path;

use stubgen_abi::{ArchFlags, Architecture};
use stubgen_lib::{klog_debug, klog_error, klog_is_enabled, klog_trace, KlogLevel};

use super::{ParamList, SyscallSpec};
use crate::error::{DescriptorError, ParseError};

/// Architecture list keyword selecting every supported target.
pub const ARCH_KEYWORD_ALL: &str = "all";

/// Architecture list keyword for entries whose stubs are written by hand.
pub const ARCH_KEYWORD_CUSTOM: &str = "custom";

/// Result of parsing a whole descriptor.
#[derive(Debug, Default)]
pub struct ParsedDescriptor {
    pub syscalls: Vec<SyscallSpec>,
    /// Non-fatal syntax diagnostics for skipped lines, in line order.
    pub diagnostics: Vec<ParseError>,
}

pub fn parse_descriptor_file(path: &Path) -> Result<ParsedDescriptor, DescriptorError> {
    klog_debug!("parse_file: {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_descriptor(&text)
}

/// Parse descriptor text.
///
/// Syntax errors are logged and collected in
/// [`ParsedDescriptor::diagnostics`]. Semantic errors are collected across the
/// whole text and then returned together as [`DescriptorError::Semantic`].
pub fn parse_descriptor(text: &str) -> Result<ParsedDescriptor, DescriptorError> {
    let mut parsed = ParsedDescriptor::default();
    let mut fatal = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line, index + 1) {
            Ok(spec) => {
                if klog_is_enabled(KlogLevel::Trace) {
                    klog_trace!("{:?}", spec);
                    klog_trace!("{}", spec.declaration());
                }
                parsed.syscalls.push(spec);
            }
            Err(err) => {
                klog_error!("{}", err);
                if err.is_fatal() {
                    fatal.push(err);
                } else {
                    parsed.diagnostics.push(err);
                }
            }
        }
    }

    if !fatal.is_empty() {
        return Err(DescriptorError::Semantic(fatal));
    }
    Ok(parsed)
}

/// Parse one non-blank, non-comment descriptor line.
pub fn parse_line(line: &str, lineno: usize) -> Result<SyscallSpec, ParseError> {
    let text = || line.to_string();

    let lparen = line.find('(').ok_or_else(|| ParseError::MissingLeftParen {
        line: lineno,
        text: text(),
    })?;
    let rparen = match line.rfind(')') {
        Some(pos) if pos > lparen => pos,
        _ => {
            return Err(ParseError::MisplacedRightParen {
                line: lineno,
                text: text(),
            });
        }
    };

    let head: Vec<&str> = line[..lparen].split_whitespace().collect();
    let Some((&symbol, return_words)) = head.split_last() else {
        return Err(ParseError::MissingReturnType {
            line: lineno,
            text: text(),
        });
    };
    if return_words.is_empty() {
        return Err(ParseError::MissingReturnType {
            line: lineno,
            text: text(),
        });
    }
    let return_type = return_words.join(" ");

    let (func_part, name, dispatch_id) = split_symbol(symbol, lineno, line)?;
    let (func, aliases) = split_aliases(func_part, lineno, line)?;
    let name = name.unwrap_or(func).to_string();

    let params = parse_params(&line[lparen + 1..rparen]);
    let arches = parse_arch_list(line[rparen + 1..].trim(), lineno, line)?;

    if dispatch_id.is_some() && arches != ArchFlags::X86 {
        return Err(ParseError::DispatchArchitecture {
            line: lineno,
            text: text(),
        });
    }

    Ok(SyscallSpec::new(
        lineno,
        name,
        func.to_string(),
        aliases,
        params,
        return_type,
        dispatch_id,
        arches,
    ))
}

/// Split `func[|aliases][:name[:id]]` into the function part (aliases still
/// attached), the optional syscall name and the optional dispatch id.
fn split_symbol<'a>(
    symbol: &'a str,
    lineno: usize,
    line: &str,
) -> Result<(&'a str, Option<&'a str>, Option<u32>), ParseError> {
    let Some(colon) = symbol.find(':') else {
        return Ok((symbol, None, None));
    };
    if colon == 0 || colon + 1 >= symbol.len() {
        return Err(ParseError::MisplacedColon {
            line: lineno,
            text: line.to_string(),
        });
    }

    let func_part = &symbol[..colon];
    let rest = &symbol[colon + 1..];
    let Some(colon2) = rest.find(':') else {
        return Ok((func_part, Some(rest), None));
    };
    if colon2 == 0 {
        return Err(ParseError::MisplacedColon {
            line: lineno,
            text: line.to_string(),
        });
    }
    if colon2 + 1 >= rest.len() {
        return Err(ParseError::MisplacedSecondColon {
            line: lineno,
            text: line.to_string(),
        });
    }

    let id_text = &rest[colon2 + 1..];
    let dispatch_id = id_text
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidDispatchId {
            line: lineno,
            id: id_text.to_string(),
            text: line.to_string(),
        })?;
    Ok((func_part, Some(&rest[..colon2]), Some(dispatch_id)))
}

fn split_aliases<'a>(
    func_part: &'a str,
    lineno: usize,
    line: &str,
) -> Result<(&'a str, Vec<String>), ParseError> {
    let Some(bar) = func_part.find('|') else {
        return Ok((func_part, Vec::new()));
    };
    let func = &func_part[..bar];
    let aliases: Vec<String> = func_part[bar + 1..]
        .split(',')
        .map(|alias| alias.trim().to_string())
        .collect();

    if func.is_empty() || aliases.iter().any(String::is_empty) {
        return Err(ParseError::MisplacedAlias {
            line: lineno,
            text: line.to_string(),
        });
    }
    if let Some(alias) = aliases.iter().find(|alias| alias.as_str() == func) {
        return Err(ParseError::AliasIsFunction {
            line: lineno,
            alias: alias.clone(),
            text: line.to_string(),
        });
    }
    Ok((func, aliases))
}

fn parse_params(inner: &str) -> ParamList {
    if inner.trim().is_empty() {
        ParamList::Void
    } else {
        ParamList::Types(inner.split(',').map(str::to_string).collect())
    }
}

fn parse_arch_list(list: &str, lineno: usize, line: &str) -> Result<ArchFlags, ParseError> {
    match list {
        ARCH_KEYWORD_ALL => return Ok(ArchFlags::all()),
        ARCH_KEYWORD_CUSTOM => return Ok(ArchFlags::empty()),
        _ => {}
    }

    let mut flags = ArchFlags::empty();
    for token in list.split(',').map(str::trim) {
        let arch = Architecture::from_name(token).ok_or_else(|| ParseError::InvalidArchitecture {
            line: lineno,
            arch: token.to_string(),
            text: line.to_string(),
        })?;
        flags |= arch.flag();
    }
    Ok(flags)
}
