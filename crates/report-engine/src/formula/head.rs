/// A formula reference split into evaluator namespace and expression body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaHead {
    namespace: String,
    body: String,
}

impl FormulaHead {
    /// Split a raw formula string.
    ///
    /// A leading `=` implies the `report` namespace; otherwise the text
    /// before the first `:` names the namespace, and text without either
    /// defaults to `report`. A trailing `;` is a common authoring mistake
    /// and is stripped with a warning.
    #[must_use]
    pub fn parse(raw: &str) -> FormulaHead {
        let mut text = raw.trim();
        if let Some(stripped) = text.strip_suffix(';') {
            log::warn!("formula '{raw}' ends with ';', stripping it");
            text = stripped.trim_end();
        }

        let (namespace, body) = if let Some(rest) = text.strip_prefix('=') {
            ("report", rest)
        } else if let Some((namespace, body)) = text.split_once(':') {
            (namespace, body)
        } else {
            ("report", text)
        };

        FormulaHead {
            namespace: namespace.trim().to_string(),
            body: body.trim().to_string(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
