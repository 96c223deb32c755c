/// A parsed method: enough of the class-file `method_info` structure for
/// the engine to run it. Access flags, exception tables, and every
/// attribute besides `Code` are discarded at parse time — this engine does
/// not verify, does not handle exceptions, and does not support anything
/// besides static methods reachable from `main` (spec.md §1 Non-goals).
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub descriptor: String,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

impl Method {
    /// Number of parameters this method's descriptor declares, derived the
    /// way spec.md §6 specifies: each occurrence of `I` or `[I` between the
    /// descriptor's `(` and `)` counts one parameter. The engine only ever
    /// calls methods built from its own Non-goal-constrained subset, but
    /// the scan below walks any primitive or object descriptor correctly
    /// so a real `javac`-compiled descriptor never confuses it.
    pub fn parameter_count(&self) -> u16 {
        let params = match self
            .descriptor
            .find('(')
            .zip(self.descriptor.find(')'))
        {
            Some((open, close)) if open < close => &self.descriptor[open + 1..close],
            _ => return 0,
        };

        let mut count = 0u16;
        let mut chars = params.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '[' => continue, // array prefix, does not end the parameter by itself
                'L' => {
                    // object type: consume up to and including ';'
                    for inner in chars.by_ref() {
                        if inner == ';' {
                            break;
                        }
                    }
                    count += 1;
                }
                _ => count += 1, // I, J, F, D, B, C, S, Z
            }
        }
        count
    }
}
