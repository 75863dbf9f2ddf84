//! Accumulated report text for one job.
//!
//! Workflow stages append lines as they progress; the lifecycle layer renders
//! the whole report into a single pull-request comment only when the job has
//! failed and the operator needs to act.

#[derive(Debug, Clone)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            lines: vec!["***Automated RT Failure Notification***".to_string()],
        }
    }

    /// Append one line to the report.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Render the report as comment text.
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_then_lines_in_order() {
        let mut report = Report::new();
        report.push("Machine: hera");
        report.push("Compiler: gnu");
        assert_eq!(
            report.render(),
            "***Automated RT Failure Notification***\nMachine: hera\nCompiler: gnu\n"
        );
    }
}
