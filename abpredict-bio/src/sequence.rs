use std::fmt;

/// A named protein sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) if !desc.is_empty() => format!(">{} {}", self.id, desc),
            _ => format!(">{}", self.id),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        write!(f, "{}", String::from_utf8_lossy(&self.sequence))
    }
}
