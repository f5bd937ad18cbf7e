// Integration tests for ISCop

mod integration {
    mod cli_test;
    mod engine_test;
    mod fixtures;
}
