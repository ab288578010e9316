use std::{collections::BTreeMap, ffi::OsStr, ffi::OsString};

use crate::paths::RuntimeDescriptor;

pub const SEARCH_PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Environment handed to the child: the inherited variables plus the search path override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchEnvironment {
    vars: BTreeMap<OsString, OsString>,
}

impl LaunchEnvironment {
    #[cfg(test)]
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsString, &OsString)> {
        self.vars.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

/// Private library directory first so bundled packages shadow global ones,
/// then the launcher directory so the entry point can import its siblings.
pub fn search_path_value(descriptor: &RuntimeDescriptor) -> OsString {
    let mut value = descriptor.library_path.clone().into_os_string();
    value.push(SEARCH_PATH_SEPARATOR);
    value.push(descriptor.self_location.with_trailing_separator());
    value
}

pub fn build_environment<I, K, V>(descriptor: &RuntimeDescriptor, base_env: I) -> LaunchEnvironment
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<OsString>,
    V: Into<OsString>,
{
    let key = &descriptor.search_path_var;
    let mut vars: BTreeMap<OsString, OsString> = base_env
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .filter(|(k, _)| !same_var(k, key))
        .collect();
    vars.insert(key.clone(), search_path_value(descriptor));
    LaunchEnvironment { vars }
}

// Windows treats variable names case-insensitively; a stale `PythonPath` would survive otherwise.
// Only ASCII letters are folded here, which covers every variable name the layout allows in practice.
fn same_var(a: &OsStr, b: &OsStr) -> bool {
    if cfg!(windows) {
        a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy())
    } else {
        a == b
    }
}
