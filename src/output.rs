use std::io::{self, Write};

use bmoisil::pbinfo::{Problem, TestCase};
use bmoisil::utils::truncate_at_word;

/// Write `problem` as indented JSON followed by a newline.
pub fn write_problem(out: &mut impl Write, problem: &Problem) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, problem)?;
    writeln!(out)
}

/// Write each test case as a numbered block, content cut at `size_limit` bytes.
pub fn write_test_cases(
    out: &mut impl Write,
    cases: &[TestCase],
    size_limit: usize,
) -> io::Result<()> {
    for (i, case) in cases.iter().enumerate() {
        write!(out, "\nTest case {}", i + 1)?;
        if case.is_example {
            write!(out, " (example)")?;
        }
        writeln!(out, ":")?;
        if case.score != 0 {
            writeln!(out, "Score: {}", case.score)?;
        }
        writeln!(out, "Input: {}", truncate_at_word(&case.input, size_limit))?;
        writeln!(out, "Output: {}", truncate_at_word(&case.expected, size_limit))?;
    }
    Ok(())
}
