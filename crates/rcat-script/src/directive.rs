//! Install-if-missing directives for R packages.

/// Packages are installed from here when absent.
pub const CRAN_MIRROR: &str = "https://cloud.r-project.org";

/// R source that installs `package` from CRAN unless it is already available.
///
/// The name must look like an R package name (a letter followed by letters,
/// digits or dots) since it is embedded into the script verbatim.
pub fn dependency_directive(package: &str) -> Result<String, String> {
    if !is_package_name(package) {
        return Err(format!("invalid R package name: '{}'", package));
    }
    Ok(format!(
        "if (!requireNamespace(\"{pkg}\", quietly = TRUE)) install.packages(\"{pkg}\", repos = \"{CRAN_MIRROR}\")",
        pkg = package
    ))
}

fn is_package_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '.')
        }
        _ => false,
    }
}
