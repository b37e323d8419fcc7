/**
 * Unparser
 *
 * Converts an AST back to a string representation so tests can compare
 * parse results as text.
 */
use template_binding::expression_parser::*;

/// Unparses an AST back to a string representation
pub fn unparse(ast: &AST) -> String {
    let mut unparser = Unparser::default();
    unparser.visit(ast);
    unparser.expression
}

#[derive(Default)]
struct Unparser {
    expression: String,
}

impl Unparser {
    fn visit(&mut self, ast: &AST) {
        match ast {
            AST::EmptyExpr(_) | AST::ImplicitReceiver(_) | AST::ThisReceiver(_) => {}
            AST::PropertyRead(node) => {
                self.visit_receiver(&node.receiver, ".");
                self.expression.push_str(&node.name);
            }
            AST::SafePropertyRead(node) => {
                self.visit(&node.receiver);
                self.expression.push_str("?.");
                self.expression.push_str(&node.name);
            }
            AST::PropertyWrite(node) => {
                self.visit_receiver(&node.receiver, ".");
                self.expression.push_str(&node.name);
                self.expression.push_str(" = ");
                self.visit(&node.value);
            }
            AST::KeyedRead(node) => {
                self.visit(&node.receiver);
                self.expression.push('[');
                self.visit(&node.key);
                self.expression.push(']');
            }
            AST::SafeKeyedRead(node) => {
                self.visit(&node.receiver);
                self.expression.push_str("?.[");
                self.visit(&node.key);
                self.expression.push(']');
            }
            AST::KeyedWrite(node) => {
                self.visit(&node.receiver);
                self.expression.push('[');
                self.visit(&node.key);
                self.expression.push_str("] = ");
                self.visit(&node.value);
            }
            AST::Call(node) => {
                self.visit(&node.receiver);
                self.visit_args("(", &node.args);
            }
            AST::SafeCall(node) => {
                self.visit(&node.receiver);
                self.visit_args("?.(", &node.args);
            }
            AST::Binary(node) => {
                self.visit(&node.left);
                self.expression.push(' ');
                self.expression.push_str(&node.operation);
                self.expression.push(' ');
                self.visit(&node.right);
            }
            AST::Unary(node) => {
                self.expression.push_str(&node.operator);
                self.visit(&node.expr);
            }
            AST::PrefixNot(node) => {
                self.expression.push('!');
                self.visit(&node.expression);
            }
            AST::NonNullAssert(node) => {
                self.visit(&node.expression);
                self.expression.push('!');
            }
            AST::Conditional(node) => {
                self.visit(&node.condition);
                self.expression.push_str(" ? ");
                self.visit(&node.true_exp);
                self.expression.push_str(" : ");
                self.visit(&node.false_exp);
            }
            AST::Chain(node) => {
                let parts: Vec<String> = node.expressions.iter().map(unparse).collect();
                self.expression.push_str(&parts.join("; "));
                self.expression.push(';');
            }
            AST::BindingPipe(node) => {
                self.expression.push('(');
                self.visit(&node.exp);
                self.expression.push_str(" | ");
                self.expression.push_str(&node.name);
                for arg in &node.args {
                    self.expression.push(':');
                    self.visit(arg);
                }
                self.expression.push(')');
            }
            AST::LiteralPrimitive(node) => match &node.value {
                LiteralValue::String(value) => {
                    self.expression.push('"');
                    self.expression.push_str(value);
                    self.expression.push('"');
                }
                other => self.expression.push_str(&other.to_string()),
            },
            AST::LiteralArray(node) => {
                self.visit_args("[", &node.expressions);
                self.expression.pop();
                self.expression.push(']');
            }
            AST::LiteralMap(node) => {
                self.expression.push('{');
                for (i, (key, value)) in node.keys.iter().zip(&node.values).enumerate() {
                    if i > 0 {
                        self.expression.push_str(", ");
                    }
                    if key.quoted {
                        self.expression.push('"');
                        self.expression.push_str(&key.key);
                        self.expression.push('"');
                    } else {
                        self.expression.push_str(&key.key);
                    }
                    self.expression.push_str(": ");
                    self.visit(value);
                }
                self.expression.push('}');
            }
            AST::Interpolation(node) => {
                for (i, string) in node.strings.iter().enumerate() {
                    self.expression.push_str(string);
                    if let Some(expression) = node.expressions.get(i) {
                        self.expression.push_str("{{ ");
                        self.visit(expression);
                        self.expression.push_str(" }}");
                    }
                }
            }
        }
    }

    fn visit_receiver(&mut self, receiver: &AST, separator: &str) {
        if !matches!(receiver, AST::ImplicitReceiver(_) | AST::ThisReceiver(_)) {
            self.visit(receiver);
            self.expression.push_str(separator);
        }
    }

    fn visit_args(&mut self, open: &str, args: &[AST]) {
        self.expression.push_str(open);
        let parts: Vec<String> = args.iter().map(unparse).collect();
        self.expression.push_str(&parts.join(", "));
        self.expression.push(')');
    }
}
