mod query_errors;
