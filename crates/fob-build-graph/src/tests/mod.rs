mod smoke_tests;
