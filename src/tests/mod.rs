mod properties;
mod test_helper;
