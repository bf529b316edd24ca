// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// AWS resource types whose schema has a `tags` map argument.
///
/// `aws_autoscaling_group` is absent on purpose: its tags are declared with
/// `tag` blocks or a list of records and get their own handling.
pub const TAGGABLE_RESOURCES: &[&str] = &[
    "aws_acm_certificate",
    "aws_alb",
    "aws_alb_target_group",
    "aws_ami",
    "aws_api_gateway_rest_api",
    "aws_api_gateway_stage",
    "aws_apigatewayv2_api",
    "aws_apigatewayv2_stage",
    "aws_appautoscaling_target",
    "aws_athena_workgroup",
    "aws_backup_plan",
    "aws_backup_vault",
    "aws_batch_compute_environment",
    "aws_batch_job_queue",
    "aws_cloud9_environment_ec2",
    "aws_cloudformation_stack",
    "aws_cloudfront_distribution",
    "aws_cloudtrail",
    "aws_cloudwatch_event_rule",
    "aws_cloudwatch_log_group",
    "aws_cloudwatch_metric_alarm",
    "aws_codebuild_project",
    "aws_codepipeline",
    "aws_cognito_user_pool",
    "aws_customer_gateway",
    "aws_db_instance",
    "aws_db_parameter_group",
    "aws_db_subnet_group",
    "aws_dynamodb_table",
    "aws_ebs_snapshot",
    "aws_ebs_volume",
    "aws_ec2_transit_gateway",
    "aws_ecr_repository",
    "aws_ecs_cluster",
    "aws_ecs_service",
    "aws_ecs_task_definition",
    "aws_efs_file_system",
    "aws_egress_only_internet_gateway",
    "aws_eip",
    "aws_eks_cluster",
    "aws_eks_node_group",
    "aws_elasticache_cluster",
    "aws_elasticache_replication_group",
    "aws_elasticsearch_domain",
    "aws_elb",
    "aws_emr_cluster",
    "aws_flow_log",
    "aws_glue_job",
    "aws_iam_policy",
    "aws_iam_role",
    "aws_iam_user",
    "aws_instance",
    "aws_internet_gateway",
    "aws_key_pair",
    "aws_kinesis_firehose_delivery_stream",
    "aws_kinesis_stream",
    "aws_kms_key",
    "aws_lambda_function",
    "aws_launch_template",
    "aws_lb",
    "aws_lb_listener",
    "aws_lb_target_group",
    "aws_macie2_classification_job",
    "aws_mq_broker",
    "aws_msk_cluster",
    "aws_nat_gateway",
    "aws_network_acl",
    "aws_network_interface",
    "aws_opensearch_domain",
    "aws_rds_cluster",
    "aws_rds_cluster_instance",
    "aws_redshift_cluster",
    "aws_route53_health_check",
    "aws_route53_zone",
    "aws_route_table",
    "aws_s3_bucket",
    "aws_sagemaker_endpoint",
    "aws_sagemaker_model",
    "aws_secretsmanager_secret",
    "aws_security_group",
    "aws_sfn_state_machine",
    "aws_sns_topic",
    "aws_sqs_queue",
    "aws_ssm_document",
    "aws_ssm_parameter",
    "aws_subnet",
    "aws_vpc",
    "aws_vpc_endpoint",
    "aws_vpc_peering_connection",
    "aws_vpn_connection",
    "aws_vpn_gateway",
    "aws_wafv2_web_acl",
];

pub fn is_taggable(resource_type: &str) -> bool {
    TAGGABLE_RESOURCES.binary_search(&resource_type).is_ok()
}
