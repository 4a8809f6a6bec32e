//! Embedded turnaround data: operation tables and fleet itineraries.
//!
//! Durations and delays are in minutes, positions in apron units (10 per
//! grid cell).  Depot lanes start at `(655, 1370)` and end at `(535, 1370)`.

// ── Operations ────────────────────────────────────────────────────────────────

// Ground crew with a lavatory and water truck.
pub const MANUAL_OPERATIONS: &str = "\
name,duration_min,dep_1,dep_2,dep_3,dep_4,dep_5,dep_6,loc_1_x,loc_1_y,loc_2_x,loc_2_y,delay_min\n\
Parking,2,,,,,,,,,,,0\n\
Connect_LDL_Rear,2,Parking,,,,,,815,325,,,0\n\
Connect_LDL_Front,2,Parking,,,,,,815,755,,,0\n\
Deboarding,8,Parking,,,,,,780,140,,,0\n\
Baggage_Unloading,10,Connect_LDL_Rear,Connect_LDL_Front,,,,,790,600,,,0\n\
Refuel_Prep,3,Parking,,,,,,725,535,,,0\n\
Refueling,10,Refuel_Prep,Deboarding,,,,,725,535,,,0\n\
Refuel_Finalising,2,Refueling,,,,,,725,535,,,0\n\
Catering_Rear,12,Deboarding,,,,,,837,227,,,0\n\
Catering_Front,12,Deboarding,,,,,,842,919,,,0\n\
Cleaning,10,Deboarding,,,,,,,,,,0\n\
Toilet_Service,6,Deboarding,,,,,,1055,255,,,0\n\
Water_Service,6,Deboarding,,,,,,1055,375,,,0\n\
Technical_Inspection,15,Parking,,,,,,1155,635,855,405,0\n\
Baggage_Loading,12,Baggage_Unloading,,,,,,790,600,,,0\n\
Remove_LDL_Rear,2,Baggage_Loading,,,,,,815,325,,,0\n\
Remove_LDL_Front,2,Baggage_Loading,,,,,,815,755,,,0\n\
Boarding,15,Cleaning,Catering_Rear,Catering_Front,Refuel_Finalising,Toilet_Service,Water_Service,780,140,,,0\n\
Pushback,3,Boarding,Remove_LDL_Rear,Remove_LDL_Front,Technical_Inspection,,,,,,,0\n\
";

// Faster docking; toilet and water servicing dropped, inspection by robot.
pub const AUTOMATED_OPERATIONS: &str = "\
name,duration_min,dep_1,dep_2,dep_3,dep_4,dep_5,dep_6,loc_1_x,loc_1_y,loc_2_x,loc_2_y,delay_min\n\
Parking,2,,,,,,,,,,,0\n\
Connect_LDL_Rear,1.5,Parking,,,,,,815,325,,,0\n\
Connect_LDL_Front,1.5,Parking,,,,,,815,755,,,0\n\
Deboarding,8,Parking,,,,,,780,140,,,0\n\
Baggage_Unloading,8,Connect_LDL_Rear,Connect_LDL_Front,,,,,790,600,,,0\n\
Refuel_Prep,2,Parking,,,,,,725,535,,,0\n\
Refueling,10,Refuel_Prep,Deboarding,,,,,725,535,,,0\n\
Refuel_Finalising,1.5,Refueling,,,,,,725,535,,,0\n\
Catering_Rear,10,Deboarding,,,,,,837,227,,,0\n\
Catering_Front,10,Deboarding,,,,,,842,919,,,0\n\
Cleaning,10,Deboarding,,,,,,,,,,0\n\
Technical_Inspection,20,Parking,,,,,,1155,635,855,405,0\n\
Baggage_Loading,10,Baggage_Unloading,,,,,,790,600,,,0\n\
Remove_LDL_Rear,1.5,Baggage_Loading,,,,,,815,325,,,0\n\
Remove_LDL_Front,1.5,Baggage_Loading,,,,,,815,755,,,0\n\
Boarding,15,Cleaning,Catering_Rear,Catering_Front,Refuel_Finalising,,,780,140,,,0\n\
Pushback,3,Boarding,Remove_LDL_Rear,Remove_LDL_Front,Technical_Inspection,,,,,,,0\n\
";

// ── Fleets ────────────────────────────────────────────────────────────────────

pub const MANUAL_FLEET: &str = "\
vehicle,archetype,start_x,start_y,start_heading,goal_x,goal_y,heading,wait,reverse,snap,start_gate,end_gate,kind\n\
Hydrant_Truck,hydrant,655,1370,-90,725,535,90,,,,Refuel_Prep,,outbound\n\
Hydrant_Truck,hydrant,655,1370,-90,535,1370,,,false,,,Refuel_Finalising,return\n\
LDL_Rear,ldl,655,1370,-90,815,325,0,,,,Connect_LDL_Rear,,outbound\n\
LDL_Rear,ldl,655,1370,-90,535,1370,,,true,,,Remove_LDL_Rear,return\n\
LDL_Front,ldl,655,1370,-90,815,755,0,,,,Connect_LDL_Front,,outbound\n\
LDL_Front,ldl,655,1370,-90,535,1370,,,true,,,Remove_LDL_Front,return\n\
Catering_Rear,catering,655,1370,-90,837,227,5,,,,Catering_Rear,,outbound\n\
Catering_Rear,catering,655,1370,-90,535,1370,,,true,,,Catering_Rear,return\n\
Catering_Front,catering,655,1370,-90,842,919,-8,,,,Catering_Front,,outbound\n\
Catering_Front,catering,655,1370,-90,535,1370,,,true,,,Catering_Front,return\n\
Baggage_Tug,tug,655,1370,-90,790,600,-90,,,,Baggage_Unloading,,outbound\n\
Baggage_Tug,tug,655,1370,-90,535,1370,,,false,,,Baggage_Loading,return\n\
Lavatory,service,655,1370,-90,1055,255,180,,,,Toilet_Service,,outbound\n\
Lavatory,service,655,1370,-90,535,1370,,,false,,,Toilet_Service,return\n\
Water,service,655,1370,-90,1055,375,180,,,,Water_Service,,outbound\n\
Water,service,655,1370,-90,535,1370,,,false,,,Water_Service,return\n\
";

// Spot walks its inspection loop while Technical_Inspection runs.
pub const AUTOMATED_FLEET: &str = "\
vehicle,archetype,start_x,start_y,start_heading,goal_x,goal_y,heading,wait,reverse,snap,start_gate,end_gate,kind\n\
Hydrant_Truck_auto,hydrant,655,1370,-90,725,535,90,,,,Refuel_Prep,,outbound\n\
Hydrant_Truck_auto,hydrant,655,1370,-90,535,1370,,,false,,,Refuel_Finalising,return\n\
LDL_Rear_auto,ldl,655,1370,-90,815,325,0,,,,Connect_LDL_Rear,,outbound\n\
LDL_Rear_auto,ldl,655,1370,-90,535,1370,,,true,,,Remove_LDL_Rear,return\n\
LDL_Front_auto,ldl,655,1370,-90,815,755,0,,,,Connect_LDL_Front,,outbound\n\
LDL_Front_auto,ldl,655,1370,-90,535,1370,,,true,,,Remove_LDL_Front,return\n\
Catering_Rear_auto,catering,655,1370,-90,837,227,5,,,,Catering_Rear,,outbound\n\
Catering_Rear_auto,catering,655,1370,-90,535,1370,,,true,,,Catering_Rear,return\n\
Catering_Front_auto,catering,655,1370,-90,842,919,-8,,,,Catering_Front,,outbound\n\
Catering_Front_auto,catering,655,1370,-90,535,1370,,,true,,,Catering_Front,return\n\
Baggage_Tug,tug,655,1370,-90,790,600,-90,,,,Baggage_Unloading,,outbound\n\
Baggage_Tug,tug,655,1370,-90,535,1370,,,false,,,Baggage_Loading,return\n\
Spot,robot,1485,735,180,1155,635,,140,,,Technical_Inspection,,\n\
Spot,robot,1485,735,180,1065,405,,140,,,,,\n\
Spot,robot,1485,735,180,1125,145,,140,,,,,\n\
Spot,robot,1485,735,180,855,145,,140,,,,,\n\
Spot,robot,1485,735,180,855,405,,140,,,,,\n\
Spot,robot,1485,735,180,755,635,,140,,,,,\n\
Spot,robot,1485,735,180,865,985,,140,,,,,\n\
Spot,robot,1485,735,180,1485,735,180,,,,,Technical_Inspection,return\n\
";
