mod pull_tests;
