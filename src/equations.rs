//! The puzzles hidden in the maze: single unknown equations to solve for `x`.

use rand::Rng;
use std::fmt;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];
}

/// An equation with a hint and the worked steps to its answer, for players who get stuck.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Equation {
    operation: Operation,
    text: String,
    answer: i64,
    hint: String,
    steps: Vec<String>,
}

impl Equation {
    /// `x + b = sum`
    pub fn addition(x: i64, b: i64) -> Equation {
        let text = format!("x + {} = {}", b, x + b);
        let steps = vec![format!("Original equation: {}", text),
                         format!("Subtract {} from both sides: x = {}", b, x)];
        Equation {
            operation: Operation::Add,
            text,
            answer: x,
            hint: String::from("Undo the addition: take the same number away from both sides"),
            steps,
        }
    }

    /// `x - b = difference`
    pub fn subtraction(difference: i64, b: i64) -> Equation {
        let text = format!("x - {} = {}", b, difference);
        let answer = difference + b;
        let steps = vec![format!("Original equation: {}", text),
                         format!("Add {} to both sides: x = {}", b, answer)];
        Equation {
            operation: Operation::Subtract,
            text,
            answer,
            hint: String::from("Undo the subtraction: add the same number to both sides"),
            steps,
        }
    }

    /// `ax = product`
    pub fn multiplication(a: i64, x: i64) -> Equation {
        let text = format!("{}x = {}", a, a * x);
        let steps = vec![format!("Original equation: {}", text),
                         format!("Divide both sides by {}: x = {}", a, x)];
        Equation {
            operation: Operation::Multiply,
            text,
            answer: x,
            hint: String::from("Undo the multiplication: divide both sides by the number next to x"),
            steps,
        }
    }

    /// An equation of a random kind. Sums and differences use terms 1 to 20, products 1 to 12.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Equation {
        match Operation::ALL[rng.gen_range(0..Operation::ALL.len())] {
            Operation::Add => Equation::addition(rng.gen_range(1..=20), rng.gen_range(1..=20)),
            Operation::Subtract => {
                Equation::subtraction(rng.gen_range(1..=20), rng.gen_range(1..=20))
            }
            Operation::Multiply => {
                Equation::multiplication(rng.gen_range(1..=12), rng.gen_range(1..=12))
            }
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn answer(&self) -> i64 {
        self.answer
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// The worked solution, starting from the equation as given.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn is_solved_by(&self, candidate: i64) -> bool {
        candidate == self.answer
    }

    /// Check a typed answer. Anything that is not a whole number is simply wrong.
    pub fn check(&self, input: &str) -> bool {
        input.trim()
             .parse::<i64>()
             .map(|candidate| self.is_solved_by(candidate))
             .unwrap_or(false)
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
