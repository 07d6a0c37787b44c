mod validator_tests;
