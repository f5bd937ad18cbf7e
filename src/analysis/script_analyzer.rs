//! Script analyser
//!
//! Parses a script document (through the cache) and runs the error-handling
//! checks over its methods: `Main` against the entry-point patterns, every
//! other public method against the public-method patterns.

use super::error_handling::ErrorHandlingCheck;
use crate::core::cache::ScriptCache;
use crate::error::Result;
use crate::models::{AccessModifier, SyntaxElement, Violation};
use crate::parsers::csharp::CSharpParser;
use crate::parsers::patterns::PatternSettings;
use crate::parsers::script::{ScriptEncoding, ScriptParser};
use log::debug;

const ENTRY_POINT: &str = "Main";

pub struct ScriptAnalyzer {
    parser: Box<dyn ScriptParser>,
    cache: ScriptCache,
    entry_point: ErrorHandlingCheck,
    public_methods: ErrorHandlingCheck,
}

impl ScriptAnalyzer {
    /// Compiles both pattern lists; an invalid pattern fails here
    pub fn new(
        parser: impl ScriptParser + 'static,
        patterns: &PatternSettings,
        cache_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            parser: Box::new(parser),
            cache: ScriptCache::new(cache_size),
            entry_point: ErrorHandlingCheck::entry_point(patterns)?,
            public_methods: ErrorHandlingCheck::public_methods(patterns)?,
        })
    }

    /// C# analyser with the given patterns
    pub fn csharp(patterns: &PatternSettings, cache_size: usize) -> Result<Self> {
        Self::new(CSharpParser::new(), patterns, cache_size)
    }

    /// Language tag of the scripts this analyser understands
    pub fn language(&self) -> &'static str {
        self.parser.language()
    }

    pub fn cache(&self) -> &ScriptCache {
        &self.cache
    }

    /// Parser violations followed by error-handling violations in
    /// declaration order. Generated documents yield nothing.
    pub fn analyze(&self, source: &str, encoding: ScriptEncoding) -> Result<Vec<Violation>> {
        let parsed = self.cache.get_or_parse(self.parser.as_ref(), source, encoding)?;
        for line in &parsed.output {
            debug!("{}", line);
        }

        if parsed.is_generated() {
            debug!("Skipping generated script document");
            return Ok(Vec::new());
        }

        let mut violations = parsed.violations.clone();
        violations.extend(self.check_methods(&parsed.root));
        Ok(violations)
    }

    /// Run the error-handling checks over every method below `root`
    pub fn check_methods(&self, root: &SyntaxElement) -> Vec<Violation> {
        let mut violations = Vec::new();
        root.walk_elements(&mut |element| {
            if let Some(check) = self.check_for(element) {
                violations.extend(check.validate(element));
            }
        });
        violations
    }

    fn check_for(&self, element: &SyntaxElement) -> Option<&ErrorHandlingCheck> {
        if !element.is_method() {
            return None;
        }
        if element.name.eq_ignore_ascii_case(ENTRY_POINT) {
            Some(&self.entry_point)
        } else if element.access == AccessModifier::Public {
            Some(&self.public_methods)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ScriptAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptAnalyzer")
            .field("language", &self.language())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error_handling::{MAIN_CHECK_ID, PUBLIC_CHECK_ID};
    use crate::parsers::script::SYNTAX_CHECK_ID;

    const COMPLIANT: &str = r#"using System;

public partial class ScriptMain
{
    public void Main()
    {
        try
        {
            Run();
        }
        catch (Exception e)
        {
            Dts.Events.FireError(0, "Package", e.Message + "\r" + e.StackTrace, string.Empty, 0);
            Dts.TaskResult = (int)ScriptResults.Failure;
        }
    }

    private void Run()
    {
    }
}
"#;

    const UNGUARDED: &str = r#"public class ScriptMain
{
    public void Main()
    {
        Run();
    }

    public void Helper()
    {
        try
        {
            Run();
        }
        catch (Exception e)
        {
            Row.Status = "FAILED";
        }
    }

    internal void Hidden()
    {
    }
}
"#;

    fn analyzer() -> ScriptAnalyzer {
        ScriptAnalyzer::csharp(&PatternSettings::builtin(), 8).unwrap()
    }

    #[test]
    fn test_compliant_script() {
        let violations = analyzer().analyze(COMPLIANT, ScriptEncoding::Utf8).unwrap();
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_entry_point_and_public_methods() {
        let violations = analyzer().analyze(UNGUARDED, ScriptEncoding::Utf8).unwrap();
        assert_eq!(violations.len(), 2);

        assert_eq!(violations[0].check_id, MAIN_CHECK_ID);
        assert_eq!(violations[0].line, 3);
        assert!(!violations[0].message.contains("Catch block"));

        // Row.Status is present, the FireWarning call is not
        assert_eq!(violations[1].check_id, PUBLIC_CHECK_ID);
        assert_eq!(violations[1].line, 8);
        assert!(violations[1].message.contains("ComponentMetaData.FireWarning"));
    }

    #[test]
    fn test_guard_inside_lambda_is_compliant() {
        let source = r#"public partial class ScriptMain
{
    public void Main()
    {
        Action run = () =>
        {
            try
            {
                Load();
            }
            catch (Exception e)
            {
                Dts.Events.FireError(0, "Package", e.Message + e.StackTrace, string.Empty, 0);
                Dts.TaskResult = (int)ScriptResults.Failure;
            }
        };
        run();
    }
}
"#;
        let violations = analyzer().analyze(source, ScriptEncoding::Utf8).unwrap();
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_generated_document_is_skipped() {
        let source = format!("// <auto-generated />\n{}", UNGUARDED);
        let violations = analyzer().analyze(&source, ScriptEncoding::Utf8).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_parser_violations_are_included() {
        let source = "public class ScriptMain { public void Main() { try { Run( } }";
        let violations = analyzer().analyze(source, ScriptEncoding::Utf8).unwrap();
        assert!(violations.iter().any(|v| v.check_id == SYNTAX_CHECK_ID));
    }

    #[test]
    fn test_repeated_sources_hit_the_cache() {
        let analyzer = analyzer();
        analyzer.analyze(COMPLIANT, ScriptEncoding::Utf8).unwrap();
        analyzer.analyze(COMPLIANT, ScriptEncoding::Utf8).unwrap();
        assert_eq!(analyzer.cache().stats(), (1, 1, 1));
    }
}
