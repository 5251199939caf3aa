mod test_reconnect;
mod test_run_loop;
