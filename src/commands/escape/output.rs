use super::execute::EscapeResult;
use crate::output::Outputable;

impl Outputable for EscapeResult {
    fn to_table(&self) -> String {
        self.escaped.clone()
    }
}
