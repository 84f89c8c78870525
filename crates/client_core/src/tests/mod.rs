mod blinder_tests;
