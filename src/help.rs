pub const COMMANDS: &str = "\
Enter one number, operator or command per line.

Operators (pop two, push the result):
   +   Addition             -   Subtraction
   *   Multiplication       /   Division
   ^   Power

Numbers:
   5, -2.5, .75     Push the number onto the stack
   6*               Push the number, then apply the operator

Commands:
   c   Clear the stack
   d   Delete the last item on the stack
   f   Flip the last two items on the stack
   s   Change the sign of the last item
   ss  Save the stack to a secondary stack and clear it
   rs  Restore the secondary stack
   h   Show this help (also ?)
   x   Save the stack and exit";

pub fn banner() -> String {
    format!(
        "RPN Calculator v{}\nEnter command 'h' for help details",
        env!("CARGO_PKG_VERSION")
    )
}
