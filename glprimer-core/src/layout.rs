//! Attribute buffer layouts and the checks run before anything is uploaded.

use thiserror::Error;

/// Errors raised when a buffer does not fit the layout it is used with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("attribute `{name}` declares {components} components, only 1 to 4 are allowed")]
    InvalidComponents { name: String, components: usize },
    #[error("attribute `{name}` has {len} floats, not a multiple of {components} components")]
    Ragged {
        name: String,
        len: usize,
        components: usize,
    },
    #[error("attribute `{name}` buffer has {provided} components, the shader declares {declared}")]
    ComponentMismatch {
        name: String,
        declared: usize,
        provided: usize,
    },
    #[error("the shader reads attribute `{name}` but no buffer feeds it")]
    Unfed { name: String },
    #[error("buffer `{name}` feeds no active attribute of the shader")]
    Undeclared { name: String },
    #[error("attribute `{name}` has {found} vertices, the mesh has {expected}")]
    CountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// How a flat float buffer is split into per-vertex attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLayout {
    pub name: String,
    pub components: usize,
}

impl AttributeLayout {
    pub fn new(name: impl Into<String>, components: usize) -> Result<Self, LayoutError> {
        let name = name.into();
        if !(1..=4).contains(&components) {
            return Err(LayoutError::InvalidComponents { name, components });
        }
        Ok(Self { name, components })
    }

    /// Number of vertices described by a buffer of `len` floats.
    pub fn vertex_count(&self, len: usize) -> Result<usize, LayoutError> {
        if len % self.components != 0 {
            return Err(LayoutError::Ragged {
                name: self.name.clone(),
                len,
                components: self.components,
            });
        }
        Ok(len / self.components)
    }
}

/// Checks that every attribute in a mesh yields the same number of
/// vertices, returning that count. An empty list has zero vertices.
pub fn common_vertex_count<'a>(
    attributes: impl IntoIterator<Item = (&'a str, usize)>,
) -> Result<usize, LayoutError> {
    let mut expected = None;
    for (name, count) in attributes {
        match expected {
            None => expected = Some(count),
            Some(expected) if expected != count => {
                return Err(LayoutError::CountMismatch {
                    name: name.to_string(),
                    expected,
                    found: count,
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(0))
}

/// Matches the attributes a program declares against the buffers a mesh
/// provides, both as `(name, components)`. Every buffer must feed a declared
/// attribute of the same size, and every declared attribute must be fed.
pub fn match_attributes(
    declared: &[(&str, usize)],
    provided: &[(&str, usize)],
) -> Result<(), LayoutError> {
    for &(name, components) in provided {
        match declared.iter().find(|(declared_name, _)| *declared_name == name) {
            None => {
                return Err(LayoutError::Undeclared {
                    name: name.to_string(),
                });
            }
            Some(&(_, declared)) if declared != components => {
                return Err(LayoutError::ComponentMismatch {
                    name: name.to_string(),
                    declared,
                    provided: components,
                });
            }
            Some(_) => {}
        }
    }
    if let Some(&(name, _)) = declared
        .iter()
        .find(|(name, _)| !provided.iter().any(|(provided, _)| provided == name))
    {
        return Err(LayoutError::Unfed {
            name: name.to_string(),
        });
    }
    Ok(())
}
