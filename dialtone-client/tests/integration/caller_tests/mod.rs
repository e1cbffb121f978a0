mod test_answer_refused;
