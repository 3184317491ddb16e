//! CLI parsing tests for escape command.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_required_arg_test! {
        command: "escape",
        test_name: test_requires_input,
        required_arg: "<INPUT>",
    }

    crate::cli_option_test! {
        command: "escape",
        variant: Escape,
        test_name: test_input_positional,
        args: ["it's"],
        field: input,
        expected: "it's".to_string(),
    }

    crate::cli_error_test! {
        command: "escape",
        test_name: test_rejects_param_flag,
        args: ["x", "--param", "1"],
    }
}
