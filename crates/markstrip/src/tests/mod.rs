mod pathological;
mod property_normalize;
