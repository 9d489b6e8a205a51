/// One input / expected output pair for a problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCase {
    pub input: Vec<u8>,
    pub expected: Vec<u8>,
    /// Whether the pair is shown publicly on the problem page.
    pub is_example: bool,
    /// Points awarded for this case, `0` when not applicable.
    pub score: i64,
}
