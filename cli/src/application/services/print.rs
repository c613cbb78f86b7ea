//! Application service: print the contents of one installed quadlet.

use crate::application::ports::QuadletFs;
use crate::application::services::directories;
use crate::domain::dirs::UnitDirLayout;
use crate::domain::error::QuadletError;

/// Contents of the highest-precedence quadlet named `name`.
///
/// # Errors
///
/// Returns `UnsupportedExtension`, `NotFound`, or `Io` if the file cannot
/// be read.
pub fn print_quadlet(
    fs: &impl QuadletFs,
    layout: &UnitDirLayout,
    name: &str,
) -> Result<String, QuadletError> {
    let path = directories::find_by_name(fs, layout, name)?;
    let contents = fs
        .read(&path)
        .map_err(|e| QuadletError::io("reading quadlet contents of", &path, e))?;
    Ok(String::from_utf8_lossy(&contents).into_owned())
}
