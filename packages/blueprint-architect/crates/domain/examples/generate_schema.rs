use domain::entities::blueprint::BlueprintPlan;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(BlueprintPlan);
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());
}
