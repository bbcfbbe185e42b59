/// The catalog shipped with the application, in the same TOML format an
/// external catalog file uses.
pub(super) const BUILTIN_CATALOG: &str = indoc::indoc! {r#"
    [materials.quartz]
    thermal_conductivity = 1.4
    specific_heat = 0.75
    default_thickness = "2mm"

    [materials.quartz.thickness."1mm"]
    base_heat_secs = 15
    base_cool_secs = 25

    [materials.quartz.thickness."2mm"]
    base_heat_secs = 25
    base_cool_secs = 40

    [materials.quartz.thickness."4mm"]
    base_heat_secs = 40
    base_cool_secs = 60

    [materials.titanium]
    thermal_conductivity = 22.0
    specific_heat = 0.52
    base_heat_secs = 20
    base_cool_secs = 30

    [materials.ceramic]
    thermal_conductivity = 1.5
    specific_heat = 0.85
    base_heat_secs = 45
    base_cool_secs = 65

    [heaters.butane_torch]
    modifier = 1.0
    max_temp_c = 1430
    efficiency = 0.85

    [heaters.bic_lighter]
    modifier = 2.2
    max_temp_c = 850
    efficiency = 0.45

    [heaters.acetylene_torch]
    modifier = 0.6
    max_temp_c = 2530
    efficiency = 0.95

    [concentrates.shatter]
    heat_modifier = 1.0
    ideal_temp = "315-400°F"
    description = "Translucent, glass-like extract that fractures easily."

    [concentrates.wax]
    heat_modifier = 1.1
    ideal_temp = "350-450°F"
    description = "Opaque, butter-like consistency."

    [concentrates.resin]
    heat_modifier = 1.2
    ideal_temp = "400-500°F"
    description = "Full-spectrum extract from fresh frozen material."

    [concentrates.rosin]
    heat_modifier = 0.9
    ideal_temp = "380-450°F"
    description = "Solventless extract pressed with heat."

    [concentrates.budder]
    heat_modifier = 1.0
    ideal_temp = "375-425°F"
    description = "Whipped, creamy texture."

    [rigs.mini_rig]
    heat_modifier = 0.8
    cool_modifier = 0.9

    [rigs.standard_rig]
    heat_modifier = 1.0
    cool_modifier = 1.0

    [rigs.recycler]
    heat_modifier = 1.1
    cool_modifier = 1.2
"#};
