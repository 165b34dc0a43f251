use std::io::prelude::*;

pub mod command;
use command::{Command, Operator};

mod stack;
pub use stack::Stack;

use crate::error::CalcError;
use crate::format::format_number;
use crate::help;

use console::style;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

const SEPARATOR: &str =
    "+----------------------------------------------------------------------+";

#[derive(Debug, Default, Clone)]
struct CalcState {
    primary: Stack,
    secondary: Stack,
}

/// What the loop should do after a command has run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    ShowHelp,
    Quit,
}

#[derive(Debug, Default)]
pub struct Interpreter {
    state: CalcState,
    step_no: usize,
}

impl Interpreter {
    pub fn new(primary: Stack) -> Self {
        Self {
            state: CalcState {
                primary,
                secondary: Stack::default(),
            },
            step_no: 0,
        }
    }

    pub fn primary(&self) -> &Stack {
        &self.state.primary
    }

    #[cfg(test)]
    pub fn secondary(&self) -> &Stack {
        &self.state.secondary
    }

    /// Read commands from `input` until a quit command or end of input,
    /// echoing the stack to `output` after each one.
    ///
    /// Bad commands, including lines that aren't valid UTF-8, are reported
    /// and the loop carries on; only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> anyhow::Result<()> {
        loop {
            self.render(&mut output)?;

            write!(output, "\n>> ")?;
            output.flush()?;

            let mut buf = Vec::new();
            if input.read_until(b'\n', &mut buf)? == 0 {
                info!("end of input after {} commands, stopping", self.step_no);
                writeln!(output)?;

                return Ok(());
            }

            // bytes that aren't UTF-8 become U+FFFD and classify as invalid input
            let line = String::from_utf8_lossy(&buf);

            match self.step(&line) {
                Ok(Outcome::Quit) => return Ok(()),
                Ok(Outcome::ShowHelp) => writeln!(output, "{}", help::COMMANDS)?,
                Ok(Outcome::Continue) => {}
                Err(e) => {
                    info!("command failed: {}", e);
                    writeln!(output, "{}", style(format!("ERROR: {}", e)).red())?;
                }
            }

            writeln!(output, "{}", style(SEPARATOR).cyan())?;
        }
    }

    /// Classify and run one line of input.
    pub fn step(&mut self, line: &str) -> Result<Outcome, CalcError> {
        self.step_no += 1;

        match Command::parse(line) {
            Some(cmd) => {
                debug!("step {}: {:?}", self.step_no, cmd);

                self.execute(cmd)
            }
            None => Ok(Outcome::Continue),
        }
    }

    #[rustfmt::skip]
    pub fn execute(&mut self, cmd: Command) -> Result<Outcome, CalcError> {
        match cmd {
            Command::Help                      => { return Ok(Outcome::ShowHelp); },
            Command::Quit                      => { return Ok(Outcome::Quit); },
            Command::Clear                     => { self.clear(); },
            Command::DeleteLast                => { self.delete_last(); },
            Command::Flip                      => { self.flip()?; },
            Command::Negate                    => { self.negate(); },
            Command::SaveStack                 => { self.save_stack(); },
            Command::RestoreStack              => { self.restore_stack(); },
            Command::Operator(op)              => { self.operator(op)?; },
            Command::Number(v)                 => { self.push(v); },
            Command::NumberThenOperator(v, op) => { self.push(v); self.operator(op)?; },
            Command::Invalid(text)             => { return Err(CalcError::InvalidInput(text)); },
        }

        Ok(Outcome::Continue)
    }

    fn render<W: Write>(&self, output: &mut W) -> std::io::Result<()> {
        for v in self.state.primary.iter() {
            writeln!(output, "{}", style(format!(":  {}", format_number(v))).yellow())?;
        }

        Ok(())
    }

    fn push(&mut self, v: f64) {
        trace!("action: push, value {:?}", v);

        self.state.primary.push(v);
    }

    fn clear(&mut self) {
        trace!("action: clear");

        self.state.primary.clear();
    }

    fn delete_last(&mut self) {
        trace!("action: delete last");

        if self.state.primary.pop().is_none() {
            info!("delete last: empty stack");
        }
    }

    fn flip(&mut self) -> Result<(), CalcError> {
        trace!("action: flip");

        self.state.primary.flip()
    }

    fn negate(&mut self) {
        trace!("action: negate");

        self.state.primary.negate_top();
    }

    fn save_stack(&mut self) {
        trace!("action: save stack");

        self.state.secondary = self.state.primary.take();
    }

    fn restore_stack(&mut self) {
        trace!("action: restore stack");

        self.state.primary = self.state.secondary.take();
    }

    fn operator(&mut self, op: Operator) -> Result<(), CalcError> {
        trace!("action: {}", op.name());

        let res = self.state.primary.apply(op)?;
        trace!("{} -> {:?}", op, res);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn values(stack: &Stack) -> Vec<f64> {
        stack.iter().collect()
    }

    fn run_lines(interp: &mut Interpreter, lines: &[&str]) -> String {
        let input = Cursor::new(lines.join("\n"));
        let mut output = Vec::new();

        interp.run(input, &mut output).unwrap();

        console::strip_ansi_codes(&String::from_utf8(output).unwrap()).into_owned()
    }

    fn session(lines: &[&str]) -> Interpreter {
        let mut interp = Interpreter::default();
        run_lines(&mut interp, lines);
        interp
    }

    #[test]
    fn addition() {
        assert_eq!(values(session(&["5", "3", "+"]).primary()), vec![8.0]);
    }

    #[test]
    fn subtraction_order() {
        assert_eq!(values(session(&["10", "4", "-"]).primary()), vec![6.0]);
    }

    #[test]
    fn number_then_operator() {
        assert_eq!(values(session(&["7", "6*"]).primary()), vec![42.0]);
        assert_eq!(values(session(&["2", "10 ^"]).primary()), vec![1024.0]);
    }

    #[test]
    fn number_then_operator_on_empty_stack_keeps_number() {
        let mut interp = Interpreter::default();

        assert!(matches!(
            interp.step("5*"),
            Err(CalcError::StackUnderflow { .. })
        ));
        assert_eq!(values(interp.primary()), vec![5.0]);
    }

    #[test]
    fn save_and_restore() {
        let mut interp = Interpreter::new(Stack::from(vec![1.0, 2.0]));

        interp.step("ss").unwrap();
        assert!(interp.primary().is_empty());
        assert_eq!(values(interp.secondary()), vec![1.0, 2.0]);

        interp.step("9").unwrap();
        interp.step("RS").unwrap();
        assert_eq!(values(interp.primary()), vec![1.0, 2.0]);
        assert!(interp.secondary().is_empty());
    }

    #[test]
    fn restore_with_empty_secondary_clears_primary() {
        let mut interp = Interpreter::new(Stack::from(vec![3.0]));

        interp.step("rs").unwrap();

        assert!(interp.primary().is_empty());
    }

    #[test]
    fn invalid_input_is_reported() {
        let mut interp = Interpreter::new(Stack::from(vec![1.0]));

        let out = run_lines(&mut interp, &["abc", "2"]);

        assert!(out.contains("ERROR: Input Error: 'abc'"));
        assert_eq!(values(interp.primary()), vec![1.0, 2.0]);
    }

    #[test]
    fn underflow_is_reported_and_loop_continues() {
        let mut interp = Interpreter::default();

        let out = run_lines(&mut interp, &["4", "+", "f", "6", "*"]);

        assert!(out.contains("ERROR: add needs 2 elements on the stack, found 1"));
        assert!(out.contains("ERROR: flip needs 2 elements on the stack, found 1"));
        assert_eq!(values(interp.primary()), vec![24.0]);
    }

    #[test]
    fn stack_commands() {
        let mut interp = Interpreter::default();

        for line in ["1", "2", "3", "f", "s"] {
            interp.step(line).unwrap();
        }
        assert_eq!(values(interp.primary()), vec![1.0, 3.0, -2.0]);

        interp.step("d").unwrap();
        assert_eq!(values(interp.primary()), vec![1.0, 3.0]);

        interp.step("C").unwrap();
        assert!(interp.primary().is_empty());

        // deleting and negating on an empty stack do nothing
        assert_eq!(interp.step("d"), Ok(Outcome::Continue));
        assert_eq!(interp.step("s"), Ok(Outcome::Continue));
        assert!(interp.primary().is_empty());
    }

    #[test]
    fn blank_line_does_nothing() {
        let mut interp = Interpreter::new(Stack::from(vec![1.0]));

        assert_eq!(interp.step("   "), Ok(Outcome::Continue));
        assert_eq!(values(interp.primary()), vec![1.0]);
    }

    #[test]
    fn quit_stops_reading() {
        let mut interp = Interpreter::default();

        let out = run_lines(&mut interp, &["1", "x", "2"]);

        assert_eq!(values(interp.primary()), vec![1.0]);
        assert_eq!(out.matches(SEPARATOR).count(), 1);
    }

    #[test]
    fn non_utf8_line_is_invalid_input() {
        let mut interp = Interpreter::new(Stack::from(vec![1.0, 2.0]));
        let input = Cursor::new(b"3\n\xff\xfe\n4\nx\n".to_vec());
        let mut output = Vec::new();

        interp.run(input, &mut output).unwrap();

        let out = String::from_utf8_lossy(&output);
        assert!(out.contains("ERROR: Input Error: '\u{fffd}\u{fffd}'"));
        assert_eq!(values(interp.primary()), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn help_is_printed() {
        let out = run_lines(&mut Interpreter::default(), &["?"]);

        assert!(out.contains(help::COMMANDS));
    }

    #[test]
    fn stack_is_rendered_with_separators() {
        let out = run_lines(&mut Interpreter::default(), &["1234567.5", "-2"]);

        assert!(out.contains(":  1,234,567.5\n:  -2\n"));
    }

    #[test]
    fn division_by_zero_lands_on_stack() {
        let out = run_lines(&mut Interpreter::default(), &["1", "0", "/"]);

        assert!(out.contains(":  Infinity"));
        assert!(!out.contains("ERROR"));
    }
}
