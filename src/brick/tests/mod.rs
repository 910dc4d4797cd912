mod test_pattern_variants;
mod test_topology;
